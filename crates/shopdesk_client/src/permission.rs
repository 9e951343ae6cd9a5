//! Permission-denied classification.
//!
//! The store reports row-level access failures in several shapes; this is
//! the one place that decides whether an error is one.

use crate::envelope::ErrorObject;

const PERMISSION_CODES: &[&str] = &["42501", "PGRST301", "PGRST302"];

const PERMISSION_PHRASES: &[&str] = &["row-level security", "permission denied"];

/// Returns true if `error` describes a row-level permission failure.
pub fn is_permission_denied(error: &ErrorObject) -> bool {
    if error.is_rls {
        return true;
    }
    if let Some(code) = error.code.as_deref() {
        if PERMISSION_CODES.contains(&code) {
            return true;
        }
    }
    let message = error.message.to_ascii_lowercase();
    PERMISSION_PHRASES
        .iter()
        .any(|phrase| message.contains(phrase))
}

/// Normalizes a permission failure on `table`.
///
/// The original code and details are kept; the message is replaced and
/// `isRLS` is set.
pub fn permission_error(original: ErrorObject, table: &str) -> ErrorObject {
    let details = original.details.unwrap_or(original.message);
    ErrorObject {
        message: format!(
            "Permission denied: access to {table} is restricted by row-level security. Sign in or check the table policies."
        ),
        code: original.code,
        details: Some(details),
        is_rls: true,
    }
}
