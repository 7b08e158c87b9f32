//! Lineup Vote Relay Library
//!
//! This library exposes the internal modules for the server binary and the
//! end-to-end tests.

pub mod config;
pub mod google_auth;
pub mod kv_store;
pub mod oauth;
pub mod server;
pub mod sheets;
pub mod voting;

// Re-export commonly used types for convenience
pub use kv_store::{FirebaseStore, InMemoryKeyValueStore, KeyValueStore};
pub use server::{run_server, RequestsLoggingLevel};
pub use sheets::{GoogleSheetsClient, InMemorySpreadsheet, SpreadsheetClient};
pub use voting::VotingService;
