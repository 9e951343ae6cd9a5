//! # ShopDesk Services
//!
//! Typed, tenant-scoped services over the resilient client.
//!
//! Each entity service validates the business id before dispatch, turns a
//! simple filter list into a query chain, and decodes rows into the entity
//! type. Every method answers with an [`Envelope`].
//!
//! ```rust,ignore
//! use shopdesk_services::{FieldFilter, Services};
//!
//! let services = Services::new(api);
//! let low_stock = services
//!     .products()
//!     .list("B1", &[FieldFilter::new("category", "Groceries")])
//!     .await;
//! let stats = services.dashboard().get_stats("B1").await;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod dashboard;
mod de;
pub mod demo;
mod entity;
mod service;

pub use dashboard::{Dashboard, DashboardStats};
pub use entity::{
    Collection, Customer, Damage, Entity, Expense, ExpenseCategory, Order, Product, Sale, Supplier,
};
pub use service::{EntityService, FieldFilter, Services};
pub use shopdesk_client::Envelope;
