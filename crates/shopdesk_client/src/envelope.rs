//! The result envelope every public operation answers with.

use serde::{Deserialize, Serialize};

/// Error code for a single-row read that matched zero or several rows.
pub const SINGLE_ROW_CODE: &str = "PGRST116";

/// Error message paired with [`SINGLE_ROW_CODE`].
pub const SINGLE_ROW_MESSAGE: &str = "JSON object requested, multiple (or no) rows returned";

fn is_false(value: &bool) -> bool {
    !*value
}

/// Error half of an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Human readable message.
    pub message: String,
    /// Machine readable code, PostgreSQL/PostgREST style where one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Extra detail, such as the underlying store message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Set when the error was classified as a row-level permission failure.
    #[serde(rename = "isRLS", default, skip_serializing_if = "is_false")]
    pub is_rls: bool,
}

impl ErrorObject {
    /// Creates an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
            is_rls: false,
        }
    }

    /// Sets the code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Returns true if the code equals `code`.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

/// Uniform `{data, error, isMock}` result.
///
/// Exactly one of `data` and `error` is normally set. Both are `None` for
/// operations with nothing to return, such as sign-out or an empty
/// `maybe_single` read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Payload on success.
    pub data: Option<T>,
    /// Failure description.
    pub error: Option<ErrorObject>,
    /// Set when `data` came from the fallback dataset.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_mock: bool,
}

impl<T> Envelope<T> {
    /// A successful envelope.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_mock: false,
        }
    }

    /// A successful envelope served from fallback data.
    pub fn mock(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_mock: true,
        }
    }

    /// A failed envelope.
    pub fn err(error: ErrorObject) -> Self {
        Self {
            data: None,
            error: Some(error),
            is_mock: false,
        }
    }

    /// An envelope with neither data nor error.
    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
            is_mock: false,
        }
    }

    /// Returns true if no error is set.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the error code, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.code.as_deref())
    }

    /// Maps the payload, keeping the error and mock flag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            data: self.data.map(f),
            error: self.error,
            is_mock: self.is_mock,
        }
    }

    /// Converts into a `Result`, surfacing the error half.
    pub fn into_result(self) -> Result<Option<T>, ErrorObject> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

impl<T, E> From<Result<T, E>> for Envelope<T>
where
    E: Into<ErrorObject>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Envelope::ok(data),
            Err(error) => Envelope::err(error.into()),
        }
    }
}
