//! Safe key to display name resolution.

use super::models::{OrderEntry, ARTIST_NAMES_PATH, ARTIST_ORDER_PATH};
use crate::kv_store::{get_typed, KeyValueStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One place a display name can be recovered from.
#[async_trait]
pub trait NameSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn lookup(&self, safe_key: &str) -> Result<Option<String>>;
}

/// Looks the key up in the `{safe, original}` pairs of the stored order.
pub struct OrderEntriesSource {
    store: Arc<dyn KeyValueStore>,
}

impl OrderEntriesSource {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NameSource for OrderEntriesSource {
    fn name(&self) -> &'static str {
        "artist order"
    }

    async fn lookup(&self, safe_key: &str) -> Result<Option<String>> {
        let entries: Vec<OrderEntry> = get_typed(self.store.as_ref(), ARTIST_ORDER_PATH)
            .await?
            .unwrap_or_default();
        Ok(entries
            .iter()
            .find(|e| e.safe_key() == safe_key)
            .and_then(|e| e.original())
            .map(str::to_string))
    }
}

/// Looks the key up in the persisted `safe key -> display name` map.
pub struct NameMapSource {
    store: Arc<dyn KeyValueStore>,
}

impl NameMapSource {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NameSource for NameMapSource {
    fn name(&self) -> &'static str {
        "name map"
    }

    async fn lookup(&self, safe_key: &str) -> Result<Option<String>> {
        let mut names: BTreeMap<String, String> =
            get_typed(self.store.as_ref(), ARTIST_NAMES_PATH)
                .await?
                .unwrap_or_default();
        Ok(names.remove(safe_key))
    }
}

/// Tries each source in order, the first hit wins.
pub struct NameResolver {
    sources: Vec<Box<dyn NameSource>>,
}

impl NameResolver {
    pub fn new(sources: Vec<Box<dyn NameSource>>) -> Self {
        Self { sources }
    }

    /// Display name for `safe_key`.
    ///
    /// A failing source counts as a miss. When every source misses, the safe
    /// key itself is returned.
    pub async fn resolve(&self, safe_key: &str) -> String {
        for source in &self.sources {
            match source.lookup(safe_key).await {
                Ok(Some(name)) => {
                    debug!("Resolved '{}' to '{}' via {}", safe_key, name, source.name());
                    return name;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        "Name lookup for '{}' via {} failed: {:#}",
                        safe_key,
                        source.name(),
                        err
                    );
                }
            }
        }

        warn!(
            "No display name found for '{}', falling back to the raw key",
            safe_key
        );
        safe_key.to_string()
    }
}
