//! Session and credential types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Authenticated user as exposed in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Free-form profile data (name, role, business id, ...).
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

/// An active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session owner.
    pub user: User,
    /// Opaque token. Carries no signature and proves nothing.
    pub access_token: String,
    /// Expiry as Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl Session {
    /// Returns true if the session expired at or before `now` (Unix seconds).
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Email and password pair. The password is accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Sign-up input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignUpRequest {
    /// Email address.
    pub email: String,
    /// Password, ignored.
    pub password: String,
    /// Metadata copied into `user_metadata`.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl SignUpRequest {
    /// Creates a request without metadata.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            data: Map::new(),
        }
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Payload of sign-in and sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The signed-in user.
    pub user: User,
    /// The new session.
    pub session: Session,
}
