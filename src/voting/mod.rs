//! Artist voting.
//!
//! Attendees vote yes/no on the artists they want played. The latest vote of
//! each artist lives in the key-value store; every submission is also
//! appended to a spreadsheet ledger that doubles as an audit log. The artist
//! roster itself comes from another range of the same spreadsheet.

mod artist_info;
mod extra_tracks;
mod ledger;
pub mod models;
mod record;
pub mod resolver;
mod roster;
pub mod safe_key;

pub use artist_info::ArtistRoster;
pub use models::{ArtistInfo, ExtraTrack, OrderEntry, Track, Vote, VoteRecord};
pub use record::VotePayload;
pub use resolver::{NameMapSource, NameResolver, NameSource, OrderEntriesSource};
pub use roster::fetch_participants;
pub use safe_key::sanitize;

use crate::config::{SheetsSettings, VotingSettings};
use crate::kv_store::KeyValueStore;
use crate::sheets::SpreadsheetClient;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("No artist data found")]
    NoArtistData,

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Upstream read failed: {0:#}")]
    Read(anyhow::Error),

    #[error("Upstream write failed: {0:#}")]
    Write(anyhow::Error),
}

/// Voting workflows, bound to one key-value store and one spreadsheet.
pub struct VotingService {
    store: Arc<dyn KeyValueStore>,
    sheets: Arc<dyn SpreadsheetClient>,
    sheets_settings: SheetsSettings,
    settings: VotingSettings,
}

impl VotingService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        sheets: Arc<dyn SpreadsheetClient>,
        sheets_settings: SheetsSettings,
        settings: VotingSettings,
    ) -> Self {
        Self {
            store,
            sheets,
            sheets_settings,
            settings,
        }
    }

    /// Resolver looking at the stored artist order first, then the name map.
    pub fn name_resolver(&self) -> NameResolver {
        NameResolver::new(vec![
            Box::new(OrderEntriesSource::new(self.store.clone())),
            Box::new(NameMapSource::new(self.store.clone())),
        ])
    }
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-06-01T20:15:00.123Z`.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
