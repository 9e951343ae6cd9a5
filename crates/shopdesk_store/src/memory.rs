//! In-memory record store.

use crate::error::{StoreError, StoreResult};
use crate::policy::{AccessPolicy, AccessScope, Operation};
use crate::selection::{Predicate, Selection};
use crate::store::RecordStore;
use crate::value::{compare_values, Row};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// An in-memory table store.
///
/// Every table is an insertion-ordered list of rows. Tables spring into
/// existence on the first insert or seed.
///
/// # Thread Safety
///
/// All tables sit behind one `RwLock`, so each primitive is atomic with
/// respect to the others. Nothing coordinates separate calls.
///
/// # Example
///
/// ```rust
/// use shopdesk_store::{AccessPolicy, AccessScope, MemoryStore, RecordStore, Selection};
///
/// let store = MemoryStore::new().with_policy("orders", AccessPolicy::AuthenticatedOnly);
/// let denied = store.select(&AccessScope::anonymous(), &Selection::new("orders"));
/// assert!(denied.is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, Vec<Row>>>,
    policies: RwLock<HashMap<String, AccessPolicy>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a dataset of the form `{"table": [rows...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is not an object of row arrays.
    pub fn from_json(dataset: &Value) -> StoreResult<Self> {
        let tables = dataset
            .as_object()
            .ok_or_else(|| StoreError::invalid_dataset("dataset must be a JSON object"))?;

        let store = Self::new();
        for (table, rows) in tables {
            let rows = rows.as_array().ok_or_else(|| {
                StoreError::invalid_dataset(format!("table {table} must be an array of rows"))
            })?;
            let rows = rows
                .iter()
                .map(|row| {
                    row.as_object().cloned().ok_or_else(|| {
                        StoreError::invalid_dataset(format!("table {table} contains a non-object row"))
                    })
                })
                .collect::<StoreResult<Vec<Row>>>()?;
            store.seed(table, rows)?;
        }
        Ok(store)
    }

    /// Attaches an access policy to `table`.
    #[must_use]
    pub fn with_policy(self, table: impl Into<String>, policy: AccessPolicy) -> Self {
        self.set_policy(table, policy);
        self
    }

    /// Replaces the access policy of `table`.
    pub fn set_policy(&self, table: impl Into<String>, policy: AccessPolicy) {
        self.policies.write().insert(table.into(), policy);
    }

    /// Returns the access policy of `table`.
    pub fn policy(&self, table: &str) -> AccessPolicy {
        self.policies.read().get(table).copied().unwrap_or_default()
    }

    /// Loads rows into `table` without any policy check.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if a row id collides with an existing row.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) -> StoreResult<usize> {
        let mut tables = self.tables.write();
        let existing = tables.get(table).map_or(&[][..], Vec::as_slice);
        let prepared = prepare_rows(table, existing, rows.into_iter().collect())?;
        let count = prepared.len();
        tables.entry(table.to_string()).or_default().extend(prepared);
        debug!(table, count, "seeded table");
        Ok(count)
    }

    /// Returns the names of all tables, sorted.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Returns the number of rows in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, Vec::len)
    }

    /// Removes every table. Policies are kept.
    pub fn clear(&self) {
        self.tables.write().clear();
    }

    fn check(&self, scope: &AccessScope, table: &str, operation: Operation) -> StoreResult<()> {
        if self.policy(table).allows(scope, operation) {
            Ok(())
        } else {
            debug!(table, %operation, "access policy rejected caller");
            Err(StoreError::permission_denied(table, operation))
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn row_id(row: &Row) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Fills in `id` and `created_at` and rejects id collisions.
fn prepare_rows(table: &str, existing: &[Row], rows: Vec<Row>) -> StoreResult<Vec<Row>> {
    let mut taken: Vec<String> = existing.iter().filter_map(row_id).collect();
    let created_at = now_millis();

    let mut prepared = Vec::with_capacity(rows.len());
    for mut row in rows {
        match row_id(&row) {
            Some(id) => {
                if taken.contains(&id) {
                    return Err(StoreError::DuplicateKey {
                        table: table.to_string(),
                        id,
                    });
                }
                taken.push(id);
            }
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                taken.push(id.clone());
                row.insert("id".to_string(), Value::String(id));
            }
        }
        row.entry("created_at")
            .or_insert_with(|| Value::from(created_at));
        prepared.push(row);
    }
    Ok(prepared)
}

impl RecordStore for MemoryStore {
    fn select(&self, scope: &AccessScope, selection: &Selection) -> StoreResult<Vec<Row>> {
        self.check(scope, &selection.table, Operation::Select)?;

        let tables = self.tables.read();
        let Some(rows) = tables.get(&selection.table) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Row> = rows
            .iter()
            .filter(|row| selection.matches(row))
            .cloned()
            .collect();
        drop(tables);

        if let Some(order) = &selection.order {
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        let limit = selection.limit.unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(selection.offset)
            .take(limit)
            .collect())
    }

    fn insert(&self, scope: &AccessScope, table: &str, rows: Vec<Row>) -> StoreResult<Vec<Row>> {
        self.check(scope, table, Operation::Insert)?;

        let mut tables = self.tables.write();
        let existing = tables.get(table).map_or(&[][..], Vec::as_slice);
        let prepared = prepare_rows(table, existing, rows)?;
        tables
            .entry(table.to_string())
            .or_default()
            .extend(prepared.iter().cloned());
        debug!(table, count = prepared.len(), "inserted rows");
        Ok(prepared)
    }

    fn update(
        &self,
        scope: &AccessScope,
        table: &str,
        predicates: &[Predicate],
        patch: &Row,
    ) -> StoreResult<Vec<Row>> {
        self.check(scope, table, Operation::Update)?;

        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let matches = |row: &Row| predicates.iter().all(|p| p.matches(row));
        if let Some(new_id) = row_id(patch) {
            let targets: Vec<&Row> = rows.iter().filter(|row| matches(row)).collect();
            let renames = targets
                .iter()
                .any(|row| row_id(row).as_deref() != Some(new_id.as_str()));
            let taken = rows
                .iter()
                .filter(|row| !matches(row))
                .any(|row| row_id(row).as_deref() == Some(new_id.as_str()));
            if renames && (taken || targets.len() > 1) {
                return Err(StoreError::DuplicateKey {
                    table: table.to_string(),
                    id: new_id,
                });
            }
        }

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| matches(row)) {
            for (column, value) in patch {
                row.insert(column.clone(), value.clone());
            }
            updated.push(row.clone());
        }
        debug!(table, count = updated.len(), "updated rows");
        Ok(updated)
    }

    fn delete(
        &self,
        scope: &AccessScope,
        table: &str,
        predicates: &[Predicate],
    ) -> StoreResult<Vec<Row>> {
        self.check(scope, table, Operation::Delete)?;

        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let (removed, kept): (Vec<Row>, Vec<Row>) = rows
            .drain(..)
            .partition(|row| predicates.iter().all(|p| p.matches(row)));
        *rows = kept;
        debug!(table, count = removed.len(), "deleted rows");
        Ok(removed)
    }

    fn has_table(&self, table: &str) -> bool {
        self.tables.read().contains_key(table)
    }
}
