//! Entry point tying a store to the auth facade.

use crate::auth::SessionManager;
use crate::config::ClientConfig;
use crate::query::QueryBuilder;
use shopdesk_store::RecordStore;
use std::fmt;
use std::sync::Arc;

/// Handle to one record store and its session.
///
/// Cloning is cheap; clones share the store and the session.
#[derive(Clone)]
pub struct DataClient {
    store: Arc<dyn RecordStore>,
    auth: Arc<SessionManager>,
    config: ClientConfig,
}

impl fmt::Debug for DataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataClient")
            .field("auth", &self.auth)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DataClient {
    /// Creates a client with default configuration.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(store, ClientConfig::default())
    }

    /// Creates a client with `config`.
    pub fn with_config(store: Arc<dyn RecordStore>, config: ClientConfig) -> Self {
        let auth = Arc::new(SessionManager::new(store.clone(), config.clone()));
        Self {
            store,
            auth,
            config,
        }
    }

    /// Starts a query on `table` under the current session.
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(self.store.clone(), self.auth.scope(), table)
    }

    /// The auth facade.
    pub fn auth(&self) -> &SessionManager {
        &self.auth
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// The configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SignUpRequest;
    use serde_json::json;
    use shopdesk_store::{AccessPolicy, MemoryStore};

    #[tokio::test]
    async fn queries_run_under_current_session() {
        let store = Arc::new(MemoryStore::new().with_policy("orders", AccessPolicy::AuthenticatedOnly));
        let client = DataClient::new(store);

        let denied = client.from("orders").await;
        assert_eq!(denied.error_code(), Some("42501"));

        client.auth().sign_up(SignUpRequest::new("a@b.c", "pw")).await;
        let allowed = client.from("orders").await;
        assert_eq!(allowed.data, Some(vec![]));
    }

    #[tokio::test]
    async fn clones_share_session() {
        let client = DataClient::new(Arc::new(MemoryStore::new()));
        let other = client.clone();
        client.auth().sign_up(SignUpRequest::new("a@b.c", "pw")).await;
        assert!(other.auth().current_session().is_some());

        other
            .from("notes")
            .insert(json!({"text": "hi"}))
            .await;
        assert_eq!(client.from("notes").await.data.unwrap().len(), 1);
    }
}
