//! Error types for record store operations.

use crate::policy::Operation;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The access policy of the table rejected the caller.
    #[error("permission denied for table {table}")]
    PermissionDenied {
        /// The table that was accessed.
        table: String,
        /// The rejected operation.
        operation: Operation,
    },

    /// A row with the same id already exists.
    #[error("duplicate key value violates unique constraint \"{table}_pkey\": id {id}")]
    DuplicateKey {
        /// The table written to.
        table: String,
        /// The conflicting id.
        id: String,
    },

    /// A dataset used for seeding has the wrong shape.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
}

impl StoreError {
    /// Creates a permission denied error.
    pub fn permission_denied(table: impl Into<String>, operation: Operation) -> Self {
        Self::PermissionDenied {
            table: table.into(),
            operation,
        }
    }

    /// Creates an invalid dataset error.
    pub fn invalid_dataset(message: impl Into<String>) -> Self {
        Self::InvalidDataset(message.into())
    }

    /// Returns the PostgreSQL-style SQLSTATE code for this error, if any.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            StoreError::PermissionDenied { .. } => Some("42501"),
            StoreError::DuplicateKey { .. } => Some("23505"),
            StoreError::InvalidDataset(_) => None,
        }
    }
}
