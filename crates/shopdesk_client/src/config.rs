//! Client configuration.

use std::time::Duration;

/// Configuration shared by the query builder, auth facade and resilient client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Lifetime of sessions created by sign-in and sign-up.
    pub session_lifetime: Duration,

    /// Whether `get` drops falsy params (`0`, `""`, `false`, `null`)
    /// instead of turning them into filters.
    pub skip_falsy_params: bool,

    /// Whether permission-denied reads retry against the fallback store.
    pub fallback_reads: bool,

    /// Whether dispatching without a session logs a warning.
    pub warn_on_anonymous: bool,

    /// Table holding the profiles sign-in looks up by email.
    pub profiles_table: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            session_lifetime: Duration::from_secs(60 * 60), // 1 hour
            skip_falsy_params: true,
            fallback_reads: true,
            warn_on_anonymous: true,
            profiles_table: "profiles".to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the session lifetime.
    #[must_use]
    pub const fn session_lifetime(mut self, lifetime: Duration) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    /// Sets whether falsy params are skipped.
    #[must_use]
    pub const fn skip_falsy_params(mut self, value: bool) -> Self {
        self.skip_falsy_params = value;
        self
    }

    /// Sets whether permission-denied reads fall back.
    #[must_use]
    pub const fn fallback_reads(mut self, value: bool) -> Self {
        self.fallback_reads = value;
        self
    }

    /// Sets whether anonymous dispatch is logged.
    #[must_use]
    pub const fn warn_on_anonymous(mut self, value: bool) -> Self {
        self.warn_on_anonymous = value;
        self
    }

    /// Sets the profiles table.
    #[must_use]
    pub fn profiles_table(mut self, table: impl Into<String>) -> Self {
        self.profiles_table = table.into();
        self
    }
}
