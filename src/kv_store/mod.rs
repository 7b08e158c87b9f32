//! Hierarchical key-value store.
//!
//! Values are JSON documents addressed by slash-separated paths
//! (`votes/Daft_Punk`). Writing under a path creates the intermediate
//! nodes; reading a node returns the whole subtree.

mod firebase;
mod memory_store;
mod trait_def;

pub use firebase::FirebaseStore;
pub use memory_store::InMemoryKeyValueStore;
pub use trait_def::{get_typed, KeyValueStore};
