//! Error types for the data-access layer.
//!
//! These never leave the crate as `Err` values through a public entry point:
//! they are converted into an [`ErrorObject`] and wrapped in an
//! [`crate::Envelope`].

use crate::envelope::{ErrorObject, SINGLE_ROW_CODE, SINGLE_ROW_MESSAGE};
use shopdesk_store::StoreError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the data-access layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A single-row read matched zero or several rows.
    #[error("JSON object requested, multiple (or no) rows returned")]
    SingleRowMismatch {
        /// Number of rows the read matched.
        rows: usize,
    },

    /// An update or delete was issued without an `eq("id", ..)` filter.
    #[error("{operation} requires an eq(\"id\", value) filter; refusing to touch every row of {table}")]
    MissingIdFilter {
        /// The refused verb.
        operation: &'static str,
        /// The target table.
        table: String,
    },

    /// Input rejected before dispatch.
    #[error("{0}")]
    Validation(String),

    /// Sign-in found no matching profile.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A recognized operation this layer does not implement.
    #[error("{feature} is not supported by the local auth facade")]
    Unsupported {
        /// Name of the operation.
        feature: &'static str,
    },

    /// Record store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Payload could not be converted to or from rows.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a missing id filter error.
    pub fn missing_id_filter(operation: &'static str, table: impl Into<String>) -> Self {
        Self::MissingIdFilter {
            operation,
            table: table.into(),
        }
    }

    /// Returns the code reported in the envelope.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ClientError::SingleRowMismatch { .. } => Some(SINGLE_ROW_CODE),
            ClientError::MissingIdFilter { .. } => Some("MISSING_ID_FILTER"),
            ClientError::Validation(_) => Some("VALIDATION_ERROR"),
            ClientError::InvalidCredentials => Some("invalid_credentials"),
            ClientError::Unsupported { .. } => Some("mfa_not_supported"),
            ClientError::Store(err) => err.code(),
            ClientError::Serialization(_) => None,
        }
    }

    /// Returns true for errors raised before anything reached the store.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::MissingIdFilter { .. }
                | ClientError::Validation(_)
                | ClientError::Serialization(_)
        )
    }
}

impl From<ClientError> for ErrorObject {
    fn from(err: ClientError) -> Self {
        let message = match &err {
            ClientError::SingleRowMismatch { .. } => SINGLE_ROW_MESSAGE.to_string(),
            other => other.to_string(),
        };
        let mut object = ErrorObject::new(message);
        object.code = err.code().map(str::to_string);
        if let ClientError::SingleRowMismatch { rows } = err {
            object.details = Some(format!("The result contains {rows} rows"));
        }
        object
    }
}
