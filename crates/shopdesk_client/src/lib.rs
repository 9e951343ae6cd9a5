//! # ShopDesk Client
//!
//! Data-access layer for ShopDesk pages.
//!
//! This crate gives every caller one protocol for reading, writing and
//! authenticating against tenant-scoped business data held in a
//! [`shopdesk_store::RecordStore`]:
//! - [`QueryBuilder`]: fluent, lazily resolved table queries
//! - [`SessionManager`]: local sign-in/sign-up/sign-out with state-change listeners
//! - [`Endpoint`]: REST-style path to table resolution
//! - [`ResilientClient`]: permission-aware dispatch with fallback reads
//!
//! Every public entry point answers with an [`Envelope`]; nothing here
//! returns an error through any other channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopdesk_client::{DataClient, Params, ResilientClient};
//! use shopdesk_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let client = DataClient::new(Arc::new(MemoryStore::new()));
//! let api = ResilientClient::new(client);
//!
//! let products = api
//!     .get("/products", &Params::new().with("business_id", "B1"))
//!     .await;
//! if let Some(error) = products.error {
//!     eprintln!("failed: {}", error.message);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod auth;
mod client;
mod config;
mod endpoint;
mod envelope;
mod error;
mod params;
pub mod permission;
pub mod query;
mod resilience;

pub use auth::{
    AuthChangeEvent, AuthResponse, Credentials, Session, SessionManager, SignUpRequest,
    Subscription, User,
};
pub use client::DataClient;
pub use config::ClientConfig;
pub use endpoint::{Endpoint, Resource};
pub use envelope::{Envelope, ErrorObject, SINGLE_ROW_CODE, SINGLE_ROW_MESSAGE};
pub use error::{ClientError, ClientResult};
pub use params::{is_truthy, Params};
pub use query::{FilterOp, QueryBuilder, QueryDescriptor, WriteResponse};
pub use resilience::ResilientClient;
pub use shopdesk_store::Row;
