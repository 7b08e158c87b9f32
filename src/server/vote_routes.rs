//! Voting endpoints.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use super::state::{GuardedVotingService, ServerState};
use crate::voting::{ArtistInfo, ExtraTrack, VotePayload};

#[derive(Deserialize, Debug)]
struct ThrobCountParams {
    host: Option<String>,
}

#[derive(Serialize, Debug)]
struct ThrobCount {
    count: usize,
}

async fn record_votes(
    State(voting): State<GuardedVotingService>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::InvalidPayload(rejection.body_text()))?;
    let payload =
        VotePayload::from_json(&body).map_err(|e| ApiError::from_voting(e, "Invalid payload"))?;

    voting
        .record_votes(payload)
        .await
        .map_err(|e| ApiError::from_voting(e, "Failed to record votes"))?;

    Ok(Json(json!({ "success": true })))
}

async fn artist_info(
    State(voting): State<GuardedVotingService>,
) -> Result<Json<ArtistInfo>, ApiError> {
    voting
        .artist_info()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_voting(e, "Failed to fetch artist info"))
}

async fn throb_count(
    State(voting): State<GuardedVotingService>,
    Query(params): Query<ThrobCountParams>,
) -> Result<Json<ThrobCount>, ApiError> {
    let host = params
        .host
        .filter(|h| !h.trim().is_empty())
        .ok_or(ApiError::MissingParameter("host"))?;

    let count = voting
        .throb_count(&host)
        .await
        .map_err(|e| ApiError::from_voting(e, "Failed to fetch throb count"))?;
    Ok(Json(ThrobCount { count }))
}

async fn extra_tracks(
    State(voting): State<GuardedVotingService>,
) -> Result<Json<Vec<ExtraTrack>>, ApiError> {
    voting
        .extra_tracks()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_voting(e, "Failed to fetch extra tracks"))
}

async fn clear_sheet(State(voting): State<GuardedVotingService>) -> Result<Json<Value>, ApiError> {
    voting
        .clear_ledger()
        .await
        .map_err(|e| ApiError::from_voting(e, "Failed to clear sheet"))?;
    Ok(Json(json!({ "message": "Sheet cleared successfully" })))
}

pub fn make_vote_routes(state: ServerState) -> Router {
    Router::new()
        .route("/record-votes", post(record_votes))
        .route("/artist-info", get(artist_info))
        .route("/throb-count", get(throb_count))
        .route("/extra-tracks", get(extra_tracks))
        .route("/clear-sheet", post(clear_sheet))
        .with_state(state)
}
