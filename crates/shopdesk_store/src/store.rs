//! Record store trait definition.

use crate::error::StoreResult;
use crate::policy::AccessScope;
use crate::selection::{Predicate, Selection};
use crate::value::Row;

/// A table store the data-access layer dispatches to.
///
/// Stores hold rows and evaluate their own access policies. They do not
/// build queries, track sessions or shape results.
///
/// # Invariants
///
/// - `select` never returns rows that fail a predicate
/// - `select` on an unknown table returns an empty list, not an error
/// - `update` and `delete` only touch rows matching every predicate
/// - Writes are atomic per call
/// - Stores must be `Send + Sync` so they can sit behind an `Arc`
///
/// # Implementors
///
/// - [`super::MemoryStore`] - in-process tables
pub trait RecordStore: Send + Sync {
    /// Reads rows described by `selection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table policy rejects `scope`.
    fn select(&self, scope: &AccessScope, selection: &Selection) -> StoreResult<Vec<Row>>;

    /// Inserts rows into `table` and returns them as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the table policy rejects `scope` or an id is
    /// already taken. No row is written in that case.
    fn insert(&self, scope: &AccessScope, table: &str, rows: Vec<Row>) -> StoreResult<Vec<Row>>;

    /// Merges `patch` into every row matching `predicates`.
    ///
    /// Returns the updated rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the table policy rejects `scope`.
    fn update(
        &self,
        scope: &AccessScope,
        table: &str,
        predicates: &[Predicate],
        patch: &Row,
    ) -> StoreResult<Vec<Row>>;

    /// Removes every row matching `predicates` and returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the table policy rejects `scope`.
    fn delete(
        &self,
        scope: &AccessScope,
        table: &str,
        predicates: &[Predicate],
    ) -> StoreResult<Vec<Row>>;

    /// Returns true if `table` exists in this store.
    fn has_table(&self, table: &str) -> bool;
}
