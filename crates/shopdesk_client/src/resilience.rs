//! Permission-aware dispatch with fallback reads.
//!
//! Every call goes through the same steps:
//! 1. warn if no session is active, then dispatch anyway
//! 2. run the query or write against the primary store
//! 3. if the error is a permission failure, reads retry against the
//!    fallback store and come back tagged `isMock`; writes, and reads the
//!    fallback cannot serve, get a normalized `isRLS` error
//! 4. any other error is returned unchanged
//!
//! Fallback failures are swallowed; the caller sees the original
//! permission error.

use crate::client::DataClient;
use crate::endpoint::Endpoint;
use crate::envelope::{Envelope, ErrorObject, SINGLE_ROW_CODE};
use crate::params::Params;
use crate::permission::{is_permission_denied, permission_error};
use crate::query::{QueryBuilder, QueryDescriptor, WriteResponse};
use serde_json::Value;
use shopdesk_store::{AccessScope, RecordStore, Row};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Dispatcher wrapping a [`DataClient`] with an optional fallback store.
#[derive(Clone)]
pub struct ResilientClient {
    client: DataClient,
    fallback: Option<Arc<dyn RecordStore>>,
}

impl fmt::Debug for ResilientClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientClient")
            .field("client", &self.client)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

impl ResilientClient {
    /// Wraps `client` without a fallback store.
    pub fn new(client: DataClient) -> Self {
        Self {
            client,
            fallback: None,
        }
    }

    /// Sets the store permission-denied reads fall back to.
    #[must_use]
    pub fn with_fallback(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.fallback = Some(store);
        self
    }

    /// The wrapped client.
    pub fn client(&self) -> &DataClient {
        &self.client
    }

    /// Returns true if a fallback store is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Reads every row of the table behind `path` matching `params`.
    ///
    /// Query-string pairs in `path` and `params` both become equality
    /// filters, `params` winning on duplicate keys. Falsy values are
    /// skipped unless `skip_falsy_params` is off.
    pub async fn get(&self, path: &str, params: &Params) -> Envelope<Vec<Row>> {
        let endpoint = self.endpoint(path);
        let filters = self.filters(&endpoint, params);
        self.read(&endpoint.table, move |query| apply_filters(query, filters))
            .await
    }

    /// Reads exactly one row of the table behind `path` matching `params`.
    pub async fn get_one(&self, path: &str, params: &Params) -> Envelope<Row> {
        let endpoint = self.endpoint(path);
        let filters = self.filters(&endpoint, params);
        self.read_one(&endpoint.table, move |query| apply_filters(query, filters))
            .await
    }

    /// Inserts `data` (object or array of objects) into the table behind `path`.
    pub async fn create(&self, path: &str, data: Value) -> Envelope<Vec<Row>> {
        let endpoint = self.endpoint(path);
        self.write(&endpoint.table, |query| query.insert(data)).await
    }

    /// Merges `patch` into the row with `id`.
    pub async fn update(&self, path: &str, id: impl Into<Value>, patch: Value) -> Envelope<Vec<Row>> {
        let endpoint = self.endpoint(path);
        let id = id.into();
        self.write(&endpoint.table, |query| query.eq("id", id).update(patch))
            .await
    }

    /// Deletes the row with `id`.
    pub async fn remove(&self, path: &str, id: impl Into<Value>) -> Envelope<Vec<Row>> {
        let endpoint = self.endpoint(path);
        let id = id.into();
        self.write(&endpoint.table, |query| query.eq("id", id).delete())
            .await
    }

    /// Runs a read built by `build` on `table`.
    pub async fn read<F>(&self, table: &str, build: F) -> Envelope<Vec<Row>>
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        self.check_session(table, "read");
        let query = build(self.client.from(table));
        let descriptor = query.descriptor().clone();
        let envelope = query.await;
        self.settle_read(&descriptor, envelope, Some)
    }

    /// Runs a single-row read built by `build` on `table`.
    pub async fn read_one<F>(&self, table: &str, build: F) -> Envelope<Row>
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        self.check_session(table, "read");
        let query = build(self.client.from(table)).single();
        let descriptor = query.descriptor().clone();
        let envelope = query.await;
        self.settle_read(&descriptor, envelope, |mut rows| {
            if rows.len() == 1 {
                rows.pop()
            } else {
                None
            }
        })
    }

    /// Runs the write `op` on `table`.
    pub async fn write<F>(&self, table: &str, op: F) -> Envelope<Vec<Row>>
    where
        F: FnOnce(QueryBuilder) -> WriteResponse,
    {
        self.check_session(table, "write");
        let envelope = op(self.client.from(table)).await;
        match envelope {
            Envelope {
                error: Some(err), ..
            } if is_permission_denied(&err) => {
                warn!(table, code = ?err.code, "write rejected by row-level security");
                Envelope::err(permission_error(err, table))
            }
            Envelope {
                error: Some(err), ..
            } => {
                log_failure(table, "write", &err);
                Envelope::err(err)
            }
            ok => ok,
        }
    }

    fn settle_read<T>(
        &self,
        descriptor: &QueryDescriptor,
        envelope: Envelope<T>,
        pick: impl FnOnce(Vec<Row>) -> Option<T>,
    ) -> Envelope<T> {
        let table = descriptor.table.as_str();
        let err = match envelope {
            Envelope {
                error: Some(err), ..
            } if is_permission_denied(&err) => err,
            Envelope {
                error: Some(err), ..
            } => {
                log_failure(table, "read", &err);
                return Envelope::err(err);
            }
            ok => return ok,
        };

        warn!(table, code = ?err.code, "read rejected by row-level security");
        if let Some(data) = self.fallback_rows(descriptor).and_then(pick) {
            info!(table, "serving read from fallback data");
            return Envelope::mock(data);
        }
        Envelope::err(permission_error(err, table))
    }

    fn fallback_rows(&self, descriptor: &QueryDescriptor) -> Option<Vec<Row>> {
        if !self.client.config().fallback_reads {
            return None;
        }
        let fallback = self.fallback.as_ref()?;
        if !fallback.has_table(&descriptor.table) {
            debug!(table = %descriptor.table, "no fallback data for table");
            return None;
        }
        match fallback.select(&AccessScope::anonymous(), &descriptor.to_selection()) {
            Ok(rows) => Some(rows),
            Err(err) => {
                debug!(table = %descriptor.table, error = %err, "fallback read failed");
                None
            }
        }
    }

    fn check_session(&self, table: &str, kind: &str) {
        if !self.client.config().warn_on_anonymous {
            return;
        }
        if self.client.auth().current_session().is_none() {
            warn!(table, kind, "no active session; dispatching anyway");
        }
    }

    fn endpoint(&self, path: &str) -> Endpoint {
        let endpoint = Endpoint::resolve(path);
        if let Some(segment) = &endpoint.trailing_segment {
            warn!(
                path,
                table = %endpoint.table,
                segment = %segment,
                "path ends in what looks like an id; it is not applied as a filter"
            );
        }
        endpoint
    }

    fn filters(&self, endpoint: &Endpoint, params: &Params) -> Vec<(String, Value)> {
        let mut merged: Params = endpoint.query.iter().cloned().collect();
        for (key, value) in params.iter() {
            merged.insert(key, value.clone());
        }

        let kept: Vec<(String, Value)> = if self.client.config().skip_falsy_params {
            merged
                .truthy()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect()
        } else {
            merged
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect()
        };
        if kept.len() < merged.len() {
            debug!(
                table = %endpoint.table,
                skipped = merged.len() - kept.len(),
                "skipped empty params"
            );
        }
        kept
    }
}

fn apply_filters(query: QueryBuilder, filters: Vec<(String, Value)>) -> QueryBuilder {
    filters
        .into_iter()
        .fold(query, |query, (column, value)| query.eq(column, value))
}

fn log_failure(table: &str, kind: &str, err: &ErrorObject) {
    if err.has_code(SINGLE_ROW_CODE) {
        debug!(table, kind, "single-row read did not match exactly one row");
    } else {
        error!(table, kind, code = ?err.code, message = %err.message, "request failed");
    }
}
