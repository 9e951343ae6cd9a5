//! Path-based reads and writes.

use super::{print_envelope, CliResult, Context};
use serde_json::Value;
use shopdesk_client::Params;

/// Runs the get command.
pub async fn get(
    context: &Context,
    path: &str,
    params: Vec<(String, Value)>,
    one: bool,
) -> CliResult<()> {
    let params: Params = params.into_iter().collect();
    if one {
        print_envelope(&context.api().get_one(path, &params).await)
    } else {
        print_envelope(&context.api().get(path, &params).await)
    }
}

/// Runs the create command.
pub async fn create(context: &Context, path: &str, data: &str) -> CliResult<()> {
    let data: Value = serde_json::from_str(data)?;
    print_envelope(&context.api().create(path, data).await)
}

/// Runs the update command.
pub async fn update(context: &Context, path: &str, id: &str, patch: &str) -> CliResult<()> {
    let patch: Value = serde_json::from_str(patch)?;
    print_envelope(&context.api().update(path, id, patch).await)
}

/// Runs the delete command.
pub async fn delete(context: &Context, path: &str, id: &str) -> CliResult<()> {
    print_envelope(&context.api().remove(path, id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CliError, ContextOptions};

    #[tokio::test]
    async fn writes_reach_the_primary_store() {
        let context = Context::open(&ContextOptions::default()).await.unwrap();

        create(&context, "/customers", r#"{"id": "c1", "business_id": "B1"}"#)
            .await
            .unwrap();
        assert_eq!(context.store().row_count("customers"), 1);

        update(&context, "/customers", "c1", r#"{"name": "Alice"}"#)
            .await
            .unwrap();
        delete(&context, "/customers", "c1").await.unwrap();
        assert_eq!(context.store().row_count("customers"), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_cli_error() {
        let context = Context::open(&ContextOptions::default()).await.unwrap();
        let result = create(&context, "/customers", "{oops").await;
        assert!(matches!(result, Err(CliError::Json(_))));
    }
}
