//! Artist roster read from the spreadsheet, and the persisted display order.

use super::models::{
    ArtistInfo, ArtistRecord, OrderEntry, Track, ARTIST_NAMES_PATH, ARTIST_ORDER_PATH,
};
use super::safe_key::sanitize;
use super::{VotingError, VotingService};
use crate::kv_store::get_typed;
use crate::sheets::Row;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use tracing::{info, warn};

const ARTIST_HEADER: &str = "Artist";

/// Artists listed in the roster sheet, in first-seen order.
///
/// Rows are `[artist, track, url]` below a header row whose first cell is
/// `Artist`. Several rows may name the same artist, one per track.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRoster {
    artists: Vec<ArtistRecord>,
}

impl ArtistRoster {
    pub fn from_rows(rows: &[Row]) -> Result<Self, VotingError> {
        let Some((header, data)) = rows.split_first() else {
            return Err(VotingError::NoArtistData);
        };
        let header_ok = header
            .first()
            .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(ARTIST_HEADER));
        if !header_ok {
            warn!("Roster sheet does not start with an '{}' header", ARTIST_HEADER);
            return Err(VotingError::NoArtistData);
        }

        let mut artists: Vec<ArtistRecord> = Vec::new();
        for row in data {
            let cell = |i: usize| row.get(i).map(|c| c.trim()).unwrap_or_default();
            let display_name = cell(0);
            if display_name.is_empty() {
                continue;
            }

            let safe_key = sanitize(display_name);
            let index = match artists.iter().position(|a| a.safe_key == safe_key) {
                Some(index) => index,
                None => {
                    artists.push(ArtistRecord {
                        safe_key,
                        display_name: display_name.to_string(),
                        tracks: Vec::new(),
                    });
                    artists.len() - 1
                }
            };

            let track = cell(1);
            if !track.is_empty() {
                artists[index].tracks.push(Track {
                    name: track.to_string(),
                    url: cell(2).to_string(),
                });
            }
        }

        if artists.is_empty() {
            return Err(VotingError::NoArtistData);
        }
        Ok(Self { artists })
    }

    pub fn keys(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.safe_key.clone()).collect()
    }

    pub fn names(&self) -> BTreeMap<String, String> {
        self.artists
            .iter()
            .map(|a| (a.safe_key.clone(), a.display_name.clone()))
            .collect()
    }

    pub fn tracks(&self) -> BTreeMap<String, Vec<Track>> {
        self.artists
            .iter()
            .map(|a| (a.safe_key.clone(), a.tracks.clone()))
            .collect()
    }

    /// Order entries for a freshly shuffled display order.
    fn shuffled_entries(&self) -> Vec<OrderEntry> {
        let mut entries: Vec<OrderEntry> = self
            .artists
            .iter()
            .map(|a| OrderEntry::Pair {
                safe: a.safe_key.clone(),
                original: a.display_name.clone(),
            })
            .collect();
        entries.shuffle(&mut rand::rng());
        entries
    }
}

impl VotingService {
    /// Artists to display, in the stored order.
    ///
    /// The order is generated once: the first request that finds no stored
    /// order shuffles the roster and stores it, later requests reuse it.
    pub async fn artist_info(&self) -> Result<ArtistInfo, VotingError> {
        let rows = self
            .sheets
            .get_values(
                &self.sheets_settings.spreadsheet_id,
                &self.sheets_settings.roster_range,
            )
            .await
            .map_err(VotingError::Read)?;
        let roster = ArtistRoster::from_rows(&rows)?;

        let entries = match self.stored_order().await? {
            Some(entries) => entries,
            None => self.generate_order(&roster).await?,
        };

        let mut names = roster.names();
        let mut unresolved = Vec::new();
        for entry in &entries {
            let key = entry.safe_key();
            if names.contains_key(key) {
                continue;
            }
            match entry.original() {
                Some(original) => {
                    names.insert(key.to_string(), original.to_string());
                }
                None => unresolved.push(key.to_string()),
            }
        }
        if !unresolved.is_empty() {
            self.fill_from_name_map(&mut names, unresolved).await;
        }

        Ok(ArtistInfo {
            order: entries.iter().map(|e| e.safe_key().to_string()).collect(),
            names,
            tracks: roster.tracks(),
        })
    }

    async fn stored_order(&self) -> Result<Option<Vec<OrderEntry>>, VotingError> {
        let entries: Option<Vec<OrderEntry>> =
            get_typed(self.store.as_ref(), ARTIST_ORDER_PATH)
                .await
                .map_err(VotingError::Read)?;
        Ok(entries.filter(|e| !e.is_empty()))
    }

    async fn generate_order(&self, roster: &ArtistRoster) -> Result<Vec<OrderEntry>, VotingError> {
        let entries = roster.shuffled_entries();
        let value = serde_json::to_value(&entries)
            .map_err(|e| VotingError::Write(anyhow::Error::new(e)))?;

        let written = self
            .store
            .set_if_absent(ARTIST_ORDER_PATH, value)
            .await
            .map_err(VotingError::Write)?;

        let entries = if written {
            info!("Generated artist order with {} artist(s)", entries.len());
            entries
        } else {
            info!("Artist order was generated concurrently, using the stored one");
            self.stored_order().await?.unwrap_or(entries)
        };

        let names = serde_json::to_value(roster.names())
            .map_err(|e| VotingError::Write(anyhow::Error::new(e)))?;
        self.store
            .set(ARTIST_NAMES_PATH, names)
            .await
            .map_err(VotingError::Write)?;

        Ok(entries)
    }

    /// Last resort for keys of an older, plain order: the persisted name map.
    async fn fill_from_name_map(&self, names: &mut BTreeMap<String, String>, keys: Vec<String>) {
        let stored: BTreeMap<String, String> =
            match get_typed(self.store.as_ref(), ARTIST_NAMES_PATH).await {
                Ok(map) => map.unwrap_or_default(),
                Err(err) => {
                    warn!("Failed to read the artist name map: {:#}", err);
                    BTreeMap::new()
                }
            };

        for key in keys {
            let name = match stored.get(&key) {
                Some(name) => name.clone(),
                None => {
                    warn!("No display name found for '{}', using the raw key", key);
                    key.clone()
                }
            };
            names.insert(key, name);
        }
    }
}
