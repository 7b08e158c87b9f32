//! In-memory key-value store.
//!
//! Mirrors the hierarchical semantics of the remote store: a single JSON
//! tree where empty objects and nulls disappear.

use super::trait_def::{path_segments, KeyValueStore};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    root: Mutex<Value>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self {
            root: Mutex::new(Value::Object(Map::new())),
        }
    }

    /// Snapshot of the whole tree.
    pub fn dump(&self) -> Value {
        self.root.lock().unwrap().clone()
    }

    fn read(root: &Value, segments: &[&str]) -> Option<Value> {
        let mut node = root;
        for segment in segments {
            node = node.as_object()?.get(*segment)?;
        }
        if is_empty(node) {
            None
        } else {
            Some(node.clone())
        }
    }

    fn write(root: &mut Value, segments: &[&str], value: Value) {
        let Some((last, parents)) = segments.split_last() else {
            *root = if value.is_null() {
                Value::Object(Map::new())
            } else {
                value
            };
            return;
        };

        let mut node = root;
        for segment in parents {
            node = object_mut(node)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        let map = object_mut(node);
        if is_empty(&value) {
            map.remove(*last);
        } else {
            map.insert(last.to_string(), value);
        }
    }
}

/// The node as an object, replacing any leaf value found on the way.
fn object_mut(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced by an object"),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let root = self.root.lock().unwrap();
        Ok(Self::read(&root, &path_segments(path)))
    }

    async fn set(&self, path: &str, value: Value) -> Result<()> {
        let mut root = self.root.lock().unwrap();
        Self::write(&mut root, &path_segments(path), value);
        Ok(())
    }

    async fn set_if_absent(&self, path: &str, value: Value) -> Result<bool> {
        let segments = path_segments(path);
        let mut root = self.root.lock().unwrap();
        if Self::read(&root, &segments).is_some() {
            return Ok(false);
        }
        Self::write(&mut root, &segments, value);
        Ok(true)
    }
}
