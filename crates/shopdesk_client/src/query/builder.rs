//! Query builder and descriptor.

use crate::envelope::Envelope;
use crate::error::{ClientError, ClientResult};
use crate::query::filter::{Filter, FilterOp};
use crate::query::write::WriteResponse;
use serde_json::Value;
use shopdesk_store::{AccessScope, Predicate, RecordStore, Row, Selection, SortOrder};
use std::fmt;
use std::future::{ready, IntoFuture, Ready};
use std::sync::Arc;
use tracing::debug;

/// Everything a query chain has accumulated.
///
/// Filters are ANDed. Inert filters are kept for inspection but never reach
/// the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryDescriptor {
    /// Target table.
    pub table: String,
    /// Column list passed to `select`. Recorded, not applied.
    pub columns: Option<String>,
    /// Evaluated filters.
    pub filters: Vec<Filter>,
    /// Accepted but unevaluated filters.
    pub inert: Vec<Filter>,
    /// Sort; the last `order` call wins.
    pub order: Option<SortOrder>,
    /// Rows skipped before the limit applies.
    pub offset: usize,
    /// Row cap.
    pub limit: Option<usize>,
    /// Whether exactly one row was requested.
    pub single_row: bool,
}

impl QueryDescriptor {
    /// Creates an unfiltered descriptor for `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Store predicates for the evaluated filters.
    pub fn predicates(&self) -> Vec<Predicate> {
        self.filters
            .iter()
            .map(|f| Predicate::new(f.column.clone(), f.value.clone()))
            .collect()
    }

    /// Returns true if an `eq("id", ..)` filter is present.
    pub fn has_id_filter(&self) -> bool {
        self.filters.iter().any(|f| f.column == "id")
    }

    /// Converts the descriptor into a store selection.
    pub fn to_selection(&self) -> Selection {
        Selection {
            table: self.table.clone(),
            predicates: self.predicates(),
            order: self.order.clone(),
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// Fluent, lazily resolved query against one table.
///
/// Nothing touches the store until the builder is awaited (or
/// [`QueryBuilder::resolve`] is called), or until a write verb runs.
///
/// # Example
///
/// ```rust,ignore
/// let orders = client
///     .from("orders")
///     .select("*")
///     .eq("business_id", "B1")
///     .order("created_at", false)
///     .limit(10)
///     .await;
/// ```
pub struct QueryBuilder {
    store: Arc<dyn RecordStore>,
    scope: AccessScope,
    descriptor: QueryDescriptor,
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("scope", &self.scope)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl QueryBuilder {
    /// Creates a builder bound to `table`.
    pub fn new(store: Arc<dyn RecordStore>, scope: AccessScope, table: impl Into<String>) -> Self {
        Self {
            store,
            scope,
            descriptor: QueryDescriptor::new(table),
        }
    }

    /// Returns the accumulated descriptor.
    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    /// Returns the access scope the query runs under.
    pub fn scope(&self) -> &AccessScope {
        &self.scope
    }

    /// Projection marker. Rows are always returned whole.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.descriptor.columns = Some(columns.to_string());
        self
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.descriptor
            .filters
            .push(Filter::new(column, FilterOp::Eq, value));
        self
    }

    fn inert(mut self, column: impl Into<String>, op: FilterOp, value: Value) -> Self {
        let filter = Filter::new(column, op, value);
        debug!(table = %self.descriptor.table, %filter, "ignoring unsupported filter operator");
        self.descriptor.inert.push(filter);
        self
    }

    /// Inequality filter. Recorded, not evaluated.
    #[must_use]
    pub fn neq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inert(column, FilterOp::Neq, value.into())
    }

    /// Greater-than filter. Recorded, not evaluated.
    #[must_use]
    pub fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inert(column, FilterOp::Gt, value.into())
    }

    /// Greater-or-equal filter. Recorded, not evaluated.
    #[must_use]
    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inert(column, FilterOp::Gte, value.into())
    }

    /// Less-than filter. Recorded, not evaluated.
    #[must_use]
    pub fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inert(column, FilterOp::Lt, value.into())
    }

    /// Less-or-equal filter. Recorded, not evaluated.
    #[must_use]
    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inert(column, FilterOp::Lte, value.into())
    }

    /// Pattern filter. Recorded, not evaluated.
    #[must_use]
    pub fn like(self, column: impl Into<String>, pattern: &str) -> Self {
        self.inert(column, FilterOp::Like, Value::from(pattern))
    }

    /// Case-insensitive pattern filter. Recorded, not evaluated.
    #[must_use]
    pub fn ilike(self, column: impl Into<String>, pattern: &str) -> Self {
        self.inert(column, FilterOp::ILike, Value::from(pattern))
    }

    /// Set-membership filter. Recorded, not evaluated.
    #[must_use]
    pub fn in_<V: Into<Value>>(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = Value::Array(values.into_iter().map(Into::into).collect());
        self.inert(column, FilterOp::In, values)
    }

    /// Identity filter. Recorded, not evaluated.
    #[must_use]
    pub fn is(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inert(column, FilterOp::Is, value.into())
    }

    /// Sorts by `column`. Replaces any earlier order.
    #[must_use]
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.descriptor.order = Some(SortOrder {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Caps the number of rows.
    #[must_use]
    pub fn limit(mut self, count: usize) -> Self {
        self.descriptor.limit = Some(count);
        self
    }

    /// Restricts the result to rows `from..=to` (zero based).
    #[must_use]
    pub fn range(mut self, from: usize, to: usize) -> Self {
        self.descriptor.offset = from;
        self.descriptor.limit = Some(if to < from { 0 } else { to - from + 1 });
        self
    }

    /// Requests exactly one row.
    pub fn single(mut self) -> SingleQuery {
        self.descriptor.single_row = true;
        SingleQuery { inner: self }
    }

    /// Requests at most one row.
    pub fn maybe_single(mut self) -> MaybeSingleQuery {
        self.descriptor.single_row = true;
        MaybeSingleQuery { inner: self }
    }

    /// Runs the read against the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the read.
    pub fn execute(&self) -> ClientResult<Vec<Row>> {
        let rows = self
            .store
            .select(&self.scope, &self.descriptor.to_selection())?;
        debug!(
            table = %self.descriptor.table,
            filters = self.descriptor.filters.len(),
            rows = rows.len(),
            "resolved query"
        );
        Ok(rows)
    }

    /// Resolves the read into an envelope.
    ///
    /// An empty match is `{data: [], error: null}`, never `data: null`.
    pub fn resolve(self) -> Envelope<Vec<Row>> {
        self.execute().into()
    }

    /// Inserts one row (object) or many (array of objects).
    pub fn insert(self, data: impl Into<Value>) -> WriteResponse {
        let result = rows_from(data.into()).and_then(|rows| {
            self.store
                .insert(&self.scope, &self.descriptor.table, rows)
                .map_err(ClientError::from)
        });
        WriteResponse::from_result(result)
    }

    /// Inserts rows, merging into existing rows that share an `id`.
    pub fn upsert(self, data: impl Into<Value>) -> WriteResponse {
        let result = rows_from(data.into()).and_then(|rows| {
            let table = &self.descriptor.table;
            let mut written = Vec::with_capacity(rows.len());
            for row in rows {
                let by_id = row.get("id").map(|id| Predicate::new("id", id.clone()));
                let existing = match &by_id {
                    Some(predicate) => {
                        let selection =
                            Selection::new(table.clone()).with_predicate(predicate.clone());
                        !self.store.select(&self.scope, &selection)?.is_empty()
                    }
                    None => false,
                };
                match by_id {
                    Some(predicate) if existing => {
                        written.extend(self.store.update(&self.scope, table, &[predicate], &row)?);
                    }
                    _ => written.extend(self.store.insert(&self.scope, table, vec![row])?),
                }
            }
            Ok(written)
        });
        WriteResponse::from_result(result)
    }

    /// Merges `patch` into the rows selected by the filters.
    ///
    /// Requires an `eq("id", ..)` filter; without one nothing is written.
    pub fn update(self, patch: impl Into<Value>) -> WriteResponse {
        let table = &self.descriptor.table;
        let result = if !self.descriptor.has_id_filter() {
            Err(ClientError::missing_id_filter("update", table.clone()))
        } else {
            match patch.into() {
                Value::Object(patch) => self
                    .store
                    .update(&self.scope, table, &self.descriptor.predicates(), &patch)
                    .map_err(ClientError::from),
                _ => Err(ClientError::validation("update payload must be a JSON object")),
            }
        };
        WriteResponse::from_result(result)
    }

    /// Deletes the rows selected by the filters.
    ///
    /// Requires an `eq("id", ..)` filter; without one nothing is removed.
    pub fn delete(self) -> WriteResponse {
        let table = &self.descriptor.table;
        let result = if !self.descriptor.has_id_filter() {
            Err(ClientError::missing_id_filter("delete", table.clone()))
        } else {
            self.store
                .delete(&self.scope, table, &self.descriptor.predicates())
                .map_err(ClientError::from)
        };
        WriteResponse::from_result(result)
    }
}

fn rows_from(data: Value) -> ClientResult<Vec<Row>> {
    match data {
        Value::Object(row) => Ok(vec![row]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                _ => Err(ClientError::validation(
                    "insert payload must be an object or an array of objects",
                )),
            })
            .collect(),
        _ => Err(ClientError::validation(
            "insert payload must be an object or an array of objects",
        )),
    }
}

impl IntoFuture for QueryBuilder {
    type Output = Envelope<Vec<Row>>;
    type IntoFuture = Ready<Envelope<Vec<Row>>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.resolve())
    }
}

/// A query that must match exactly one row.
#[derive(Debug)]
pub struct SingleQuery {
    inner: QueryBuilder,
}

impl SingleQuery {
    /// Returns the accumulated descriptor.
    pub fn descriptor(&self) -> &QueryDescriptor {
        self.inner.descriptor()
    }

    /// Resolves the read.
    ///
    /// Zero or several matches yield the `PGRST116` error.
    pub fn resolve(self) -> Envelope<Row> {
        self.inner
            .execute()
            .and_then(|rows| exactly_one(rows, false).map(|row| row.unwrap_or_default()))
            .into()
    }
}

impl IntoFuture for SingleQuery {
    type Output = Envelope<Row>;
    type IntoFuture = Ready<Envelope<Row>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.resolve())
    }
}

/// A query that may match zero or one row.
#[derive(Debug)]
pub struct MaybeSingleQuery {
    inner: QueryBuilder,
}

impl MaybeSingleQuery {
    /// Returns the accumulated descriptor.
    pub fn descriptor(&self) -> &QueryDescriptor {
        self.inner.descriptor()
    }

    /// Resolves the read.
    ///
    /// No match is `{data: null, error: null}`; several matches yield the
    /// `PGRST116` error.
    pub fn resolve(self) -> Envelope<Row> {
        match self.inner.execute().and_then(|rows| exactly_one(rows, true)) {
            Ok(Some(row)) => Envelope::ok(row),
            Ok(None) => Envelope::empty(),
            Err(err) => Envelope::err(err.into()),
        }
    }
}

impl IntoFuture for MaybeSingleQuery {
    type Output = Envelope<Row>;
    type IntoFuture = Ready<Envelope<Row>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.resolve())
    }
}

/// Returns the only row, `None` for zero rows when `allow_empty` is set.
fn exactly_one(mut rows: Vec<Row>, allow_empty: bool) -> ClientResult<Option<Row>> {
    match rows.len() {
        1 => Ok(rows.pop()),
        0 if allow_empty => Ok(None),
        count => Err(ClientError::SingleRowMismatch { rows: count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::SINGLE_ROW_CODE;
    use serde_json::json;
    use shopdesk_store::{AccessPolicy, MemoryStore};

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn seeded() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store
            .seed(
                "products",
                vec![
                    row(json!({"id": "p1", "name": "Soap", "price": 3, "business_id": "B1"})),
                    row(json!({"id": "p2", "name": "Rice", "price": 12, "business_id": "B1"})),
                    row(json!({"id": "p3", "name": "Oil", "price": 7, "business_id": "B2"})),
                ],
            )
            .unwrap();
        Arc::new(store)
    }

    fn query(store: &Arc<MemoryStore>, table: &str) -> QueryBuilder {
        QueryBuilder::new(store.clone(), AccessScope::anonymous(), table)
    }

    #[tokio::test]
    async fn eq_filters_are_anded() {
        let store = seeded();
        let result = query(&store, "products")
            .select("*")
            .eq("business_id", "B1")
            .eq("name", "Rice")
            .await;
        let rows = result.data.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!("p2"));
    }

    #[tokio::test]
    async fn no_match_is_empty_list_not_null() {
        let store = seeded();
        let result = query(&store, "products").eq("business_id", "B9").await;
        assert_eq!(result.data, Some(vec![]));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn last_order_wins() {
        let store = seeded();
        let result = query(&store, "products")
            .order("name", true)
            .order("price", false)
            .await;
        let ids: Vec<_> = result.data.unwrap().iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!("p2"), json!("p3"), json!("p1")]);
    }

    #[tokio::test]
    async fn limit_and_range() {
        let store = seeded();
        let limited = query(&store, "products").order("price", true).limit(2).await;
        assert_eq!(limited.data.unwrap().len(), 2);

        let ranged = query(&store, "products").order("price", true).range(1, 2).await;
        let ids: Vec<_> = ranged.data.unwrap().iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!("p3"), json!("p2")]);
    }

    #[tokio::test]
    async fn single_with_one_match() {
        let store = seeded();
        let result = query(&store, "products").eq("id", "p1").single().await;
        assert_eq!(result.data.unwrap()["name"], json!("Soap"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn single_with_zero_or_many_matches() {
        let store = seeded();
        for result in [
            query(&store, "products").eq("id", "missing").single().await,
            query(&store, "products").eq("business_id", "B1").single().await,
        ] {
            assert!(result.data.is_none());
            let error = result.error.unwrap();
            assert_eq!(error.code.as_deref(), Some(SINGLE_ROW_CODE));
            assert_eq!(
                error.message,
                "JSON object requested, multiple (or no) rows returned"
            );
        }
    }

    #[tokio::test]
    async fn maybe_single_allows_empty() {
        let store = seeded();
        let empty = query(&store, "products").eq("id", "missing").maybe_single().await;
        assert_eq!(empty, Envelope::empty());

        let many = query(&store, "products").maybe_single().await;
        assert_eq!(many.error_code(), Some(SINGLE_ROW_CODE));
    }

    #[tokio::test]
    async fn inert_operators_do_not_change_results() {
        let store = seeded();
        let builder = query(&store, "products")
            .eq("business_id", "B1")
            .gt("price", 5)
            .like("name", "%ic%")
            .in_("id", ["p1"])
            .neq("name", "Soap");
        assert_eq!(builder.descriptor().filters.len(), 1);
        assert_eq!(builder.descriptor().inert.len(), 4);

        let rows = builder.await.data.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn insert_then_read() {
        let store = seeded();
        let inserted = query(&store, "customers")
            .insert(json!({"name": "Alice", "business_id": "B1"}))
            .select()
            .single()
            .await;
        let rows = inserted.data.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0]["id"].is_string());

        let read = query(&store, "customers").eq("business_id", "B1").await;
        assert_eq!(read.data.unwrap()[0]["name"], json!("Alice"));
    }

    #[tokio::test]
    async fn insert_rejects_scalar_payload() {
        let store = seeded();
        let result = query(&store, "customers").insert(json!(42)).await;
        assert_eq!(result.error_code(), Some("VALIDATION_ERROR"));
        assert!(!store.has_table("customers"));
    }

    #[tokio::test]
    async fn update_requires_id_filter() {
        let store = seeded();
        let result = query(&store, "products")
            .eq("business_id", "B1")
            .update(json!({"price": 0}))
            .await;
        assert_eq!(result.error_code(), Some("MISSING_ID_FILTER"));

        let prices = query(&store, "products").eq("business_id", "B1").await;
        assert!(prices
            .data
            .unwrap()
            .iter()
            .all(|r| r["price"] != json!(0)));
    }

    #[tokio::test]
    async fn update_by_id() {
        let store = seeded();
        let result = query(&store, "products")
            .eq("id", "p2")
            .update(json!({"price": 13}))
            .await;
        assert_eq!(result.data.unwrap()[0]["price"], json!(13));
    }

    #[tokio::test]
    async fn delete_requires_id_filter() {
        let store = seeded();
        let result = query(&store, "products").delete().await;
        assert_eq!(result.error_code(), Some("MISSING_ID_FILTER"));
        assert_eq!(store.row_count("products"), 3);

        let removed = query(&store, "products").eq("id", "p3").delete().await;
        assert_eq!(removed.data.unwrap().len(), 1);
        assert_eq!(store.row_count("products"), 2);
    }

    #[tokio::test]
    async fn upsert_merges_existing_and_inserts_new() {
        let store = seeded();
        let result = query(&store, "products")
            .upsert(json!([
                {"id": "p1", "price": 4},
                {"id": "p4", "name": "Salt", "business_id": "B1"}
            ]))
            .await;
        assert_eq!(result.data.unwrap().len(), 2);
        assert_eq!(store.row_count("products"), 4);

        let soap = query(&store, "products").eq("id", "p1").single().await;
        let soap = soap.data.unwrap();
        assert_eq!(soap["price"], json!(4));
        assert_eq!(soap["name"], json!("Soap"));
    }

    #[tokio::test]
    async fn store_permission_error_passes_through() {
        let store = Arc::new(MemoryStore::new().with_policy("orders", AccessPolicy::Deny));
        let result = query(&store, "orders").await;
        assert_eq!(result.error_code(), Some("42501"));
    }

    #[test]
    fn nothing_runs_until_resolved() {
        let store = Arc::new(MemoryStore::new().with_policy("orders", AccessPolicy::Deny));
        let builder = query(&store, "orders").eq("id", 1);
        assert_eq!(builder.descriptor().table, "orders");
        assert!(builder.execute().is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn store_of(prices: &[i64]) -> Arc<MemoryStore> {
            let store = MemoryStore::new();
            store
                .seed(
                    "products",
                    prices
                        .iter()
                        .enumerate()
                        .map(|(i, price)| row(json!({"id": i, "price": price}))),
                )
                .unwrap();
            Arc::new(store)
        }

        proptest! {
            #[test]
            fn inert_filters_never_change_results(
                prices in prop::collection::vec(-50i64..50, 0..20),
                threshold in -50i64..50,
            ) {
                let store = store_of(&prices);
                let plain = query(&store, "products").resolve();
                let filtered = query(&store, "products")
                    .gt("price", threshold)
                    .lte("price", threshold)
                    .in_("price", [threshold])
                    .resolve();
                prop_assert_eq!(plain, filtered);
            }

            #[test]
            fn range_returns_window(
                count in 0usize..20,
                from in 0usize..25,
                len in 0usize..10,
            ) {
                let store = store_of(&vec![1; count]);
                let to = from + len;
                let rows = query(&store, "products")
                    .order("id", true)
                    .range(from, to)
                    .resolve()
                    .data
                    .unwrap();
                let expected = count.saturating_sub(from).min(len + 1);
                prop_assert_eq!(rows.len(), expected);
                if let Some(first) = rows.first() {
                    prop_assert_eq!(&first["id"], &json!(from));
                }
            }

            #[test]
            fn single_succeeds_only_for_one_match(count in 0usize..5) {
                let store = store_of(&vec![7; count]);
                let result = query(&store, "products").eq("price", 7).single().resolve();
                if count == 1 {
                    prop_assert!(result.error.is_none());
                } else {
                    prop_assert_eq!(result.error_code(), Some(SINGLE_ROW_CODE));
                }
            }
        }
    }
}
