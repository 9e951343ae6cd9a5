//! Fluent query builder.
//!
//! A query binds to one table, accumulates filters, ordering and limits,
//! and resolves only when awaited. Write verbs are terminal and dispatch
//! immediately.
//!
//! ```text
//! Unbound --eq()*--> Filtered --await--> Envelope<Vec<Row>>
//!                        |--single()/maybe_single()--> await --> Envelope<Row>
//!                        `--insert()/upsert()/update()/delete()--> WriteResponse
//! ```

mod builder;
mod filter;
mod write;

pub use builder::{MaybeSingleQuery, QueryBuilder, QueryDescriptor, SingleQuery};
pub use filter::{Filter, FilterOp};
pub use write::WriteResponse;
