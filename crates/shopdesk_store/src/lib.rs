//! # ShopDesk Store
//!
//! In-memory record store for the ShopDesk data-access layer.
//!
//! The store is a plain table store: every table is an ordered list of JSON
//! object rows. It knows nothing about query builders, sessions or result
//! envelopes; those live in `shopdesk_client`.
//!
//! ## Design Principles
//!
//! - Tables are created lazily on first insert or seed
//! - Filtering is equality-only and string-tolerant, like REST filter params
//! - Access policies are evaluated per table against an [`AccessScope`]
//! - Must be `Send + Sync` so one store can back many clients
//!
//! ## Example
//!
//! ```rust
//! use shopdesk_store::{AccessScope, MemoryStore, Predicate, RecordStore, Selection};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! let scope = AccessScope::anonymous();
//! let row = json!({"name": "Widget", "business_id": "B1"});
//! store.insert(&scope, "products", vec![row.as_object().unwrap().clone()]).unwrap();
//!
//! let selection = Selection::new("products").with_predicate(Predicate::new("business_id", "B1"));
//! let rows = store.select(&scope, &selection).unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod error;
mod memory;
mod policy;
mod selection;
mod store;
mod value;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use policy::{AccessPolicy, AccessScope, Operation};
pub use selection::{Predicate, Selection, SortOrder};
pub use store::RecordStore;
pub use value::{compare_values, loose_eq, Row};
