//! CLI command implementations.

mod context;
pub mod data;
pub mod stats;
pub mod tables;

pub use context::{Context, ContextOptions};

use serde::Serialize;
use serde_json::Value;
use shopdesk_client::Envelope;
use shopdesk_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the CLI itself, before or after dispatch.
///
/// Failed operations are not errors here; their envelopes are printed.
#[derive(Debug, Error)]
pub enum CliError {
    /// The seed file could not be read.
    #[error("cannot read seed file {path}: {source}")]
    SeedIo {
        /// Seed file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Malformed JSON input.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset could not be loaded into a store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// `--as` named no known profile.
    #[error("sign-in failed: {0}")]
    SignIn(String),
}

/// Result alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Parses a `key=value` filter.
///
/// The value is read as JSON when it parses (`id=5`, `active=true`) and as a
/// plain string otherwise.
pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Prints an envelope as pretty JSON on stdout.
pub fn print_envelope<T: Serialize>(envelope: &Envelope<T>) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_parse_as_json_when_possible() {
        assert_eq!(parse_param("id=5").unwrap(), ("id".into(), json!(5)));
        assert_eq!(parse_param("active=true").unwrap(), ("active".into(), json!(true)));
        assert_eq!(
            parse_param("business_id=B1").unwrap(),
            ("business_id".into(), json!("B1"))
        );
    }

    #[test]
    fn params_keep_everything_after_first_equals() {
        assert_eq!(parse_param("note=a=b").unwrap(), ("note".into(), json!("a=b")));
        assert_eq!(parse_param("name=").unwrap(), ("name".into(), json!("")));
    }

    #[test]
    fn malformed_params_are_rejected() {
        assert!(parse_param("business_id").is_err());
        assert!(parse_param("=B1").is_err());
    }
}
