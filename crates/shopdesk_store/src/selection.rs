//! Read selections handed to a [`crate::RecordStore`].

use crate::value::{loose_eq, Row};
use serde_json::Value;

/// Equality predicate on a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column name.
    pub column: String,
    /// Expected value.
    pub value: Value,
}

impl Predicate {
    /// Creates a predicate.
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Returns true if `row` satisfies the predicate.
    ///
    /// A missing column behaves like `null`.
    pub fn matches(&self, row: &Row) -> bool {
        let stored = row.get(&self.column).unwrap_or(&Value::Null);
        loose_eq(stored, &self.value)
    }
}

/// Sort instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    /// Column to sort by.
    pub column: String,
    /// Ascending if true.
    pub ascending: bool,
}

/// A read against one table.
///
/// Predicates are ANDed. Sorting is stable, so rows that compare equal keep
/// their insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    /// Table to read.
    pub table: String,
    /// Equality predicates, all of which must hold.
    pub predicates: Vec<Predicate>,
    /// Optional sort.
    pub order: Option<SortOrder>,
    /// Number of leading rows to skip.
    pub offset: usize,
    /// Maximum number of rows to return.
    pub limit: Option<usize>,
}

impl Selection {
    /// Creates a selection over every row of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Adds a predicate.
    #[must_use]
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn with_order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(SortOrder {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the row offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns true if `row` satisfies every predicate.
    pub fn matches(&self, row: &Row) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_selection_matches_everything() {
        let selection = Selection::new("products");
        assert!(selection.matches(&row(json!({"id": "p1"}))));
    }

    #[test]
    fn predicates_are_anded() {
        let selection = Selection::new("products")
            .with_predicate(Predicate::new("business_id", "B1"))
            .with_predicate(Predicate::new("active", true));

        assert!(selection.matches(&row(json!({"business_id": "B1", "active": true}))));
        assert!(!selection.matches(&row(json!({"business_id": "B1", "active": false}))));
        assert!(!selection.matches(&row(json!({"business_id": "B2", "active": true}))));
    }

    #[test]
    fn missing_column_does_not_match_value() {
        let predicate = Predicate::new("business_id", "B1");
        assert!(!predicate.matches(&row(json!({"id": "p1"}))));
    }
}
