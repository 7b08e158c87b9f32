//! KeyValueStore trait definition.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Path-addressed JSON storage.
///
/// The two write operations carry different contracts:
/// - [`set`](KeyValueStore::set) always overwrites, last write wins.
/// - [`set_if_absent`](KeyValueStore::set_if_absent) only writes when nothing
///   is stored at the path and never touches an existing value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored at `path`, `None` if the node is empty.
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Overwrite the node at `path`. Writing `Value::Null` deletes it.
    async fn set(&self, path: &str, value: Value) -> Result<()>;

    /// Write `value` at `path` only if the node is empty.
    ///
    /// Returns `true` if the value was written, `false` if something was
    /// already there (including a concurrent writer that won the race).
    async fn set_if_absent(&self, path: &str, value: Value) -> Result<bool>;
}

/// Reads `path` and deserializes it into `T`.
pub async fn get_typed<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    path: &str,
) -> Result<Option<T>> {
    match store.get(path).await? {
        Some(value) => {
            let parsed = serde_json::from_value(value)
                .with_context(|| format!("Unexpected data layout at '{}'", path))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Splits a path into its non-empty segments, `"/a//b/"` becomes `["a", "b"]`.
pub(super) fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
