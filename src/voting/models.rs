//! Voting data model and its layout in the key-value store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const ARTIST_ORDER_PATH: &str = "artistOrder";
pub const ARTIST_NAMES_PATH: &str = "artistNames";
pub const VOTES_PATH: &str = "votes";
pub const HOST_PATH: &str = "host";
pub const GUESTS_PATH: &str = "guests";

pub fn vote_path(safe_key: &str) -> String {
    format!("{}/{}", VOTES_PATH, safe_key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Yes,
    No,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Yes => "yes",
            Vote::No => "no",
        }
    }

    /// Accepts `"yes"`/`"no"` in any case, and booleans.
    pub fn from_json(value: &Value) -> Option<Vote> {
        match value {
            Value::Bool(true) => Some(Vote::Yes),
            Value::Bool(false) => Some(Vote::No),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" => Some(Vote::Yes),
                "no" => Some(Vote::No),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Latest votes for one artist, stored at `votes/<safe key>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub original_name: String,
    pub votes: BTreeMap<String, Vote>,
    pub timestamp: String,
}

/// One element of the stored artist order.
///
/// Older orders only stored the safe key; newer ones carry the display name
/// alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OrderEntry {
    Pair { safe: String, original: String },
    Plain(String),
}

impl OrderEntry {
    pub fn safe_key(&self) -> &str {
        match self {
            OrderEntry::Pair { safe, .. } => safe,
            OrderEntry::Plain(safe) => safe,
        }
    }

    pub fn original(&self) -> Option<&str> {
        match self {
            OrderEntry::Pair { original, .. } => Some(original),
            OrderEntry::Plain(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRecord {
    pub safe_key: String,
    pub display_name: String,
    pub tracks: Vec<Track>,
}

/// What the voting page needs to render the artists.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArtistInfo {
    pub order: Vec<String>,
    pub names: BTreeMap<String, String>,
    pub tracks: BTreeMap<String, Vec<Track>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtraTrack {
    pub artist: String,
    pub track: String,
    #[serde(rename = "spotifyUrl")]
    pub spotify_url: String,
}
