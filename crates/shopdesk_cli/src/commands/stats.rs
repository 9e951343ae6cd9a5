//! Stats command implementation.

use super::{print_envelope, CliResult, Context};

/// Runs the stats command.
pub async fn run(context: &Context, business_id: &str) -> CliResult<()> {
    let stats = context.services().dashboard().get_stats(business_id).await;
    print_envelope(&stats)
}
