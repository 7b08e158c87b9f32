//! Vote ledger: one spreadsheet row per submission.

use super::{VotingError, VotingService};
use crate::sheets::{A1Range, Row, ValueInputOption};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::models::Vote;

pub const TIMESTAMP_HEADER: &str = "TIMESTAMP";
pub const ARTIST_HEADER: &str = "ARTIST";

/// Participant columns start after the timestamp and artist columns.
const FIRST_PARTICIPANT_COLUMN: usize = 2;

pub fn ledger_header(roster: &[String]) -> Row {
    [TIMESTAMP_HEADER, ARTIST_HEADER]
        .iter()
        .map(|s| s.to_string())
        .chain(roster.iter().cloned())
        .collect()
}

/// Votes laid out in roster order. Participants who did not vote get an empty
/// cell, voters outside the roster get no column.
pub fn ledger_row(
    timestamp: &str,
    display_name: &str,
    roster: &[String],
    votes: &BTreeMap<String, Vote>,
) -> Row {
    let mut row = vec![timestamp.to_string(), display_name.to_string()];
    row.extend(roster.iter().map(|participant| {
        votes
            .get(participant)
            .map(|v| v.as_str().to_string())
            .unwrap_or_default()
    }));
    row
}

/// Counts `yes` cells (any case) below the header column named `host`.
fn count_yes(rows: &[Row], host: &str) -> Option<usize> {
    let header = rows.first()?;
    let column = header
        .iter()
        .enumerate()
        .skip(FIRST_PARTICIPANT_COLUMN)
        .find(|(_, cell)| cell.trim() == host)
        .map(|(i, _)| i)?;

    Some(
        rows.iter()
            .skip(1)
            .filter(|row| {
                row.get(column)
                    .is_some_and(|cell| cell.trim().eq_ignore_ascii_case("yes"))
            })
            .count(),
    )
}

impl VotingService {
    /// Writes the ledger header when it is missing or differs from the roster.
    ///
    /// Stale trailing header cells are blanked.
    pub(super) async fn ensure_ledger_header(&self, roster: &[String]) -> Result<(), VotingError> {
        let header_row = A1Range::parse(&self.sheets_settings.ledger_range)
            .map_err(VotingError::Read)?
            .first_row();

        let current = self
            .sheets
            .get_values(
                &self.sheets_settings.spreadsheet_id,
                &header_row.to_string(),
            )
            .await
            .map_err(VotingError::Read)?
            .into_iter()
            .next()
            .unwrap_or_default();

        let mut header = ledger_header(roster);
        if current == header {
            debug!("Ledger header is up to date");
            return Ok(());
        }

        info!("Updating ledger header to {} participant(s)", roster.len());
        if current.len() > header.len() {
            header.resize(current.len(), String::new());
        }
        // Sized to the header so a large roster never overflows the range
        let header_range = header_row.with_width(header.len()).to_string();
        self.sheets
            .update_values(
                &self.sheets_settings.spreadsheet_id,
                &header_range,
                vec![header],
                ValueInputOption::Raw,
            )
            .await
            .map_err(VotingError::Write)
    }

    /// Number of `yes` votes cast by `host` across the whole ledger.
    pub async fn throb_count(&self, host: &str) -> Result<usize, VotingError> {
        let host = host.trim();
        let rows = self
            .sheets
            .get_values(
                &self.sheets_settings.spreadsheet_id,
                &self.sheets_settings.ledger_range,
            )
            .await
            .map_err(VotingError::Read)?;

        count_yes(&rows, host).ok_or_else(|| VotingError::HostNotFound(host.to_string()))
    }

    /// Blanks the configured clear range of the ledger.
    pub async fn clear_ledger(&self) -> Result<(), VotingError> {
        info!("Clearing ledger range {}", self.sheets_settings.clear_range);
        self.sheets
            .clear_values(
                &self.sheets_settings.spreadsheet_id,
                &self.sheets_settings.clear_range,
            )
            .await
            .map_err(VotingError::Write)
    }
}
