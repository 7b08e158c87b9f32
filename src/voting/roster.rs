//! Participant roster: the host plus every guest.

use super::models::{GUESTS_PATH, HOST_PATH};
use crate::kv_store::KeyValueStore;
use anyhow::Result;
use serde_json::Value;

/// Participant ids found under `host` and `guests`, sorted and deduplicated.
pub async fn fetch_participants(store: &dyn KeyValueStore) -> Result<Vec<String>> {
    let (host, guests) = tokio::try_join!(store.get(HOST_PATH), store.get(GUESTS_PATH))?;

    let mut participants: Vec<String> = [host, guests]
        .into_iter()
        .flatten()
        .flat_map(participant_ids)
        .collect();
    participants.sort();
    participants.dedup();
    Ok(participants)
}

/// Ids are the object keys. A plain array of ids or a single string is
/// accepted as well, since hand-edited databases sometimes look like that.
fn participant_ids(node: Value) -> Vec<String> {
    match node {
        Value::Object(map) => map.into_iter().map(|(k, _)| k).collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    }
    .into_iter()
    .map(|id| id.trim().to_string())
    .filter(|id| !id.is_empty())
    .collect()
}
