//! Table access policies.
//!
//! Policies emulate row-level security at table granularity. The store
//! evaluates them; it never decides who the caller is.

use std::fmt;

/// Who is asking the store for data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessScope {
    /// Authenticated user id, `None` for anonymous callers.
    pub user_id: Option<String>,
}

impl AccessScope {
    /// An anonymous caller.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A caller authenticated as `user_id`.
    #[must_use]
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// Returns true if the caller is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Store primitive being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Row read.
    Select,
    /// Row insert.
    Insert,
    /// Row update.
    Update,
    /// Row delete.
    Delete,
}

impl Operation {
    /// Returns true for reads.
    pub fn is_read(self) -> bool {
        matches!(self, Operation::Select)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Select => "select",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Access policy attached to a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Anyone may read and write.
    #[default]
    Open,
    /// Only authenticated callers may read and write.
    AuthenticatedOnly,
    /// Every caller is rejected.
    Deny,
}

impl AccessPolicy {
    /// Returns true if `scope` may perform `operation` under this policy.
    pub fn allows(self, scope: &AccessScope, _operation: Operation) -> bool {
        match self {
            AccessPolicy::Open => true,
            AccessPolicy::AuthenticatedOnly => scope.is_authenticated(),
            AccessPolicy::Deny => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_allows_anonymous() {
        assert!(AccessPolicy::Open.allows(&AccessScope::anonymous(), Operation::Select));
    }

    #[test]
    fn authenticated_only() {
        let policy = AccessPolicy::AuthenticatedOnly;
        assert!(!policy.allows(&AccessScope::anonymous(), Operation::Select));
        assert!(policy.allows(&AccessScope::authenticated("u1"), Operation::Insert));
    }

    #[test]
    fn deny_rejects_everyone() {
        let policy = AccessPolicy::Deny;
        assert!(!policy.allows(&AccessScope::authenticated("u1"), Operation::Select));
    }
}
