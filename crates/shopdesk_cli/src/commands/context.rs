//! Store and client setup shared by every command.

use super::{CliError, CliResult};
use shopdesk_client::{Credentials, DataClient, ResilientClient};
use shopdesk_services::demo::fallback_store;
use shopdesk_services::Services;
use shopdesk_store::{AccessPolicy, MemoryStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Global options that shape the [`Context`].
#[derive(Debug, Default, Clone)]
pub struct ContextOptions {
    /// Dataset loaded into the primary store.
    pub seed: Option<PathBuf>,
    /// Attach the bundled demo dataset as fallback store.
    pub fallback: bool,
    /// Tables restricted to signed-in callers.
    pub restricted: Vec<String>,
    /// Email to sign in as.
    pub sign_in_as: Option<String>,
}

/// Primary store plus the services dispatching against it.
pub struct Context {
    store: Arc<MemoryStore>,
    services: Services,
}

impl Context {
    /// Builds the primary store, wires the client and signs in if asked.
    pub async fn open(options: &ContextOptions) -> CliResult<Self> {
        let store = match &options.seed {
            Some(path) => load_seed(path)?,
            None => MemoryStore::new(),
        };
        for table in &options.restricted {
            store.set_policy(table.as_str(), AccessPolicy::AuthenticatedOnly);
        }
        let store = Arc::new(store);

        let mut api = ResilientClient::new(DataClient::new(store.clone()));
        if options.fallback {
            api = api.with_fallback(Arc::new(fallback_store()?));
        }

        let auth = api.client().auth();
        auth.init();
        if let Some(email) = &options.sign_in_as {
            let response = auth
                .sign_in_with_password(&Credentials::new(email.as_str(), ""))
                .await;
            if let Some(err) = response.error {
                return Err(CliError::SignIn(err.message));
            }
        }

        Ok(Self {
            store,
            services: Services::new(api),
        })
    }

    /// The primary store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// The typed services.
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// The resilient client.
    pub fn api(&self) -> &ResilientClient {
        self.services.api()
    }

    /// Ends the session.
    pub fn shutdown(&self) {
        self.api().client().auth().teardown();
    }
}

fn load_seed(path: &Path) -> CliResult<MemoryStore> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::SeedIo {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset: serde_json::Value = serde_json::from_str(&text)?;
    let store = MemoryStore::from_json(&dataset)?;
    info!(path = %path.display(), tables = store.table_names().len(), "loaded seed");
    Ok(store)
}
