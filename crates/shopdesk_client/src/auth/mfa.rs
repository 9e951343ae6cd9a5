//! Multi-factor authentication stubs.
//!
//! Some pages call these. The local facade has no second factor, so every
//! call fails with `mfa_not_supported`, except `list_factors`, which
//! reports no factors.

use crate::auth::session::Session;
use crate::envelope::Envelope;
use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Second-factor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorType {
    /// Time-based one-time password.
    Totp,
    /// SMS code.
    Phone,
}

/// An enrolled factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    /// Factor id.
    pub id: String,
    /// Factor kind.
    pub factor_type: FactorType,
    /// `verified` or `unverified`.
    pub status: String,
}

/// A pending challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfaChallenge {
    /// Challenge id.
    pub id: String,
    /// Expiry as Unix seconds.
    pub expires_at: u64,
}

/// MFA operations of the auth facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mfa;

impl Mfa {
    /// Starts enrolling a factor. Always unsupported.
    pub async fn enroll(&self, factor_type: FactorType) -> Envelope<Factor> {
        debug!(?factor_type, "mfa enroll requested");
        unsupported("mfa.enroll")
    }

    /// Creates a challenge for a factor. Always unsupported.
    pub async fn challenge(&self, factor_id: &str) -> Envelope<MfaChallenge> {
        debug!(factor_id, "mfa challenge requested");
        unsupported("mfa.challenge")
    }

    /// Verifies a challenge response. Always unsupported.
    pub async fn verify(&self, factor_id: &str, challenge_id: &str, _code: &str) -> Envelope<Session> {
        debug!(factor_id, challenge_id, "mfa verify requested");
        unsupported("mfa.verify")
    }

    /// Lists enrolled factors. Always empty.
    pub async fn list_factors(&self) -> Envelope<Vec<Factor>> {
        Envelope::ok(Vec::new())
    }
}

fn unsupported<T>(feature: &'static str) -> Envelope<T> {
    Envelope::err(ClientError::Unsupported { feature }.into())
}
