//! ShopDesk CLI
//!
//! Runs queries, writes and dashboard aggregates against a JSON-seeded
//! in-memory store, printing every result envelope as JSON.
//!
//! # Commands
//!
//! - `get` - Read rows through an endpoint path
//! - `create` / `update` / `delete` - Write through an endpoint path
//! - `stats` - Dashboard aggregates for one business
//! - `tables` - List known endpoints and loaded tables

mod commands;

use clap::{Parser, Subcommand};
use commands::{Context, ContextOptions};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ShopDesk data-access command-line tools.
#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON dataset of the form {"table": [rows...]} to load as the primary store
    #[arg(global = true, short, long)]
    seed: Option<PathBuf>,

    /// Serve permission-denied reads from the bundled demo dataset
    #[arg(global = true, short, long)]
    fallback: bool,

    /// Table that only signed-in callers may access (repeatable)
    #[arg(global = true, short, long = "restrict")]
    restrict: Vec<String>,

    /// Sign in as the profile with this email before running the command
    #[arg(global = true, long = "as")]
    sign_in_as: Option<String>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read rows through an endpoint path
    Get {
        /// Endpoint path, e.g. /products?business_id=B1
        path: String,

        /// Equality filter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = commands::parse_param)]
        params: Vec<(String, Value)>,

        /// Expect exactly one row
        #[arg(long)]
        one: bool,
    },

    /// Insert a JSON object or array through an endpoint path
    Create {
        /// Endpoint path
        path: String,

        /// Row data as JSON
        data: String,
    },

    /// Merge a JSON patch into the row with the given id
    Update {
        /// Endpoint path
        path: String,

        /// Row id
        id: String,

        /// Patch as JSON
        data: String,
    },

    /// Delete the row with the given id
    Delete {
        /// Endpoint path
        path: String,

        /// Row id
        id: String,
    },

    /// Show dashboard aggregates for a business
    Stats {
        /// Business id
        business_id: String,
    },

    /// List known endpoints and loaded tables
    Tables,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("ShopDesk CLI v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let options = ContextOptions {
        seed: cli.seed,
        fallback: cli.fallback,
        restricted: cli.restrict,
        sign_in_as: cli.sign_in_as,
    };
    let context = Context::open(&options).await?;

    match cli.command {
        Commands::Get { path, params, one } => {
            commands::data::get(&context, &path, params, one).await?;
        }
        Commands::Create { path, data } => {
            commands::data::create(&context, &path, &data).await?;
        }
        Commands::Update { path, id, data } => {
            commands::data::update(&context, &path, &id, &data).await?;
        }
        Commands::Delete { path, id } => {
            commands::data::delete(&context, &path, &id).await?;
        }
        Commands::Stats { business_id } => {
            commands::stats::run(&context, &business_id).await?;
        }
        Commands::Tables => {
            commands::tables::run(&context)?;
        }
        Commands::Version => {}
    }

    context.shutdown();
    Ok(())
}
