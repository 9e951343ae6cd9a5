//! Local authentication facade.
//!
//! Sessions are derived from rows of the profiles table. **No password is
//! ever checked**: anyone who knows an email present in the profiles table
//! can sign in as that user. This facade stands in for a real auth backend
//! during development and must not be treated as a security boundary.
//!
//! Sessions live only in process memory. Nothing survives a restart.

mod listeners;
mod manager;
mod mfa;
mod session;

pub use listeners::{AuthChangeEvent, Subscription};
pub use manager::SessionManager;
pub use mfa::{Factor, FactorType, Mfa, MfaChallenge};
pub use session::{AuthResponse, Credentials, Session, SignUpRequest, User};
