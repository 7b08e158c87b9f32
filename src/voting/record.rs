//! Vote recording.

use super::ledger::ledger_row;
use super::models::{vote_path, Vote, VoteRecord};
use super::roster::fetch_participants;
use super::safe_key::{is_path_segment, sanitize};
use super::{now_timestamp, VotingError, VotingService};
use crate::sheets::ValueInputOption;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A validated `POST /record-votes` body.
#[derive(Debug, Clone, PartialEq)]
pub struct VotePayload {
    /// Safe key of the artist voted on.
    pub artist: String,
    pub votes: BTreeMap<String, Vote>,
}

impl VotePayload {
    pub fn from_json(body: &Value) -> Result<Self, VotingError> {
        let artist = match body.get("artist") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::String(_)) | None => {
                return Err(VotingError::InvalidPayload(
                    "Artist name is required".to_string(),
                ))
            }
            Some(_) => {
                return Err(VotingError::InvalidPayload(
                    "Artist name must be a string".to_string(),
                ))
            }
        };
        if sanitize(&artist) != artist {
            return Err(VotingError::InvalidPayload(format!(
                "Artist must be a safe key, got {:?}",
                artist
            )));
        }

        let Some(raw_votes) = body.get("votes").and_then(Value::as_object) else {
            return Err(VotingError::InvalidPayload(
                "Votes must be an object".to_string(),
            ));
        };

        let mut votes = BTreeMap::new();
        for (participant, value) in raw_votes {
            if !is_path_segment(participant) {
                return Err(VotingError::InvalidPayload(format!(
                    "Invalid participant id {:?}",
                    participant
                )));
            }
            let vote = Vote::from_json(value).ok_or_else(|| {
                VotingError::InvalidPayload(format!(
                    "Invalid vote for {}: expected \"yes\" or \"no\"",
                    participant
                ))
            })?;
            votes.insert(participant.clone(), vote);
        }

        Ok(Self { artist, votes })
    }
}

impl VotingService {
    /// Stores the latest votes of an artist and appends them to the ledger.
    ///
    /// Steps are not rolled back: a failed ledger append leaves the stored
    /// record in place.
    pub async fn record_votes(&self, payload: VotePayload) -> Result<(), VotingError> {
        let VotePayload { artist, mut votes } = payload;

        let original_name = self.name_resolver().resolve(&artist).await;
        let roster = fetch_participants(self.store.as_ref())
            .await
            .map_err(VotingError::Read)?;

        if self.settings.fill_missing_votes {
            for participant in &roster {
                votes.entry(participant.clone()).or_insert(Vote::No);
            }
        }

        let timestamp = now_timestamp();
        let record = VoteRecord {
            original_name: original_name.clone(),
            votes,
            timestamp: timestamp.clone(),
        };
        let value = serde_json::to_value(&record)
            .map_err(|e| VotingError::Write(anyhow::Error::new(e)))?;
        self.store
            .set(&vote_path(&artist), value)
            .await
            .map_err(VotingError::Write)?;
        debug!("Stored {} vote(s) for {}", record.votes.len(), artist);

        self.ensure_ledger_header(&roster).await?;

        let row = ledger_row(&timestamp, &original_name, &roster, &record.votes);
        self.sheets
            .append_values(
                &self.sheets_settings.spreadsheet_id,
                &self.sheets_settings.ledger_range,
                vec![row],
                ValueInputOption::UserEntered,
            )
            .await
            .map_err(VotingError::Write)?;

        info!("Recorded votes for {} ({})", original_name, artist);
        Ok(())
    }
}
