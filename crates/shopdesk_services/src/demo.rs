//! Bundled demo dataset used as the secondary data source.

use serde_json::Value;
use shopdesk_store::{MemoryStore, StoreError, StoreResult};

/// Business id every demo row belongs to.
pub const DEMO_BUSINESS_ID: &str = "demo-business";

/// The demo dataset, a JSON object of `table -> [rows]`.
pub const FALLBACK_DATASET: &str = include_str!("../data/fallback.json");

/// Builds a store seeded with [`FALLBACK_DATASET`].
pub fn fallback_store() -> StoreResult<MemoryStore> {
    let dataset: Value = serde_json::from_str(FALLBACK_DATASET)
        .map_err(|err| StoreError::invalid_dataset(err.to_string()))?;
    MemoryStore::from_json(&dataset)
}
