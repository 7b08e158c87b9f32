//! Extra tracks suggested in a separate spreadsheet range.

use super::models::ExtraTrack;
use super::{VotingError, VotingService};
use crate::sheets::Row;
use tracing::debug;

/// Keeps complete `[artist, track, link]` rows, in sheet order.
fn parse_extra_tracks(rows: Vec<Row>) -> Vec<ExtraTrack> {
    rows.into_iter()
        .filter_map(|row| {
            let mut cells = row.into_iter().map(|c| c.trim().to_string());
            let artist = cells.next().filter(|c| !c.is_empty())?;
            let track = cells.next().filter(|c| !c.is_empty())?;
            let spotify_url = cells.next().filter(|c| !c.is_empty())?;
            Some(ExtraTrack {
                artist,
                track,
                spotify_url,
            })
        })
        .collect()
}

impl VotingService {
    /// Additional tracks suggested outside the main roster.
    pub async fn extra_tracks(&self) -> Result<Vec<ExtraTrack>, VotingError> {
        let rows = self
            .sheets
            .get_values(
                &self.sheets_settings.extra_spreadsheet_id,
                &self.sheets_settings.extra_range,
            )
            .await
            .map_err(VotingError::Read)?;
        let total = rows.len();
        let tracks = parse_extra_tracks(rows);
        debug!("{} of {} extra track row(s) are complete", tracks.len(), total);
        Ok(tracks)
    }
}
