//! Test data seeded into the in-memory stores.

use super::constants::*;
use lineup_vote_relay::sheets::Row;
use lineup_vote_relay::{InMemoryKeyValueStore, InMemorySpreadsheet, KeyValueStore};
use serde_json::json;

pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Creates the three sheets. The ledger starts empty.
pub fn seed_spreadsheet(sheets: &InMemorySpreadsheet) {
    sheets.put_rows(
        SPREADSHEET_ID,
        ARTISTS_SHEET,
        vec![
            row(&["Artist", "Track", "Link"]),
            row(&[ARTIST_1_NAME, "Thunderstruck", "https://open.spotify.com/track/acdc1"]),
            row(&[ARTIST_2_NAME, "Hoppípolla", "https://open.spotify.com/track/sr1"]),
            row(&[ARTIST_1_NAME, "Highway to Hell", "https://open.spotify.com/track/acdc2"]),
            row(&[ARTIST_3_NAME, "", ""]),
        ],
    );
    sheets.put_rows(SPREADSHEET_ID, VOTES_SHEET, Vec::new());
    sheets.put_rows(
        SPREADSHEET_ID,
        EXTRA_SHEET,
        vec![
            row(&["Artist", "Track", "Link"]),
            row(&["Moby", "Porcelain", "https://open.spotify.com/track/moby"]),
            row(&["Air", "", "https://open.spotify.com/track/air"]),
            row(&["Röyksopp", "Eple", "https://open.spotify.com/track/eple"]),
            row(&["Massive Attack", "Teardrop"]),
        ],
    );
}

/// Host plus two guests.
pub async fn seed_participants(store: &InMemoryKeyValueStore) {
    store
        .set("host", json!({ HOST_ID: { "joinedAt": "2024-06-01T19:00:00Z" } }))
        .await
        .expect("Failed to seed host");
    store
        .set("guests", json!({ GUEST_1_ID: true, GUEST_2_ID: true }))
        .await
        .expect("Failed to seed guests");
}
