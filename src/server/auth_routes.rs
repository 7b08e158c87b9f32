//! Spotify authorization-code flow.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::ApiError;
use super::state::{GuardedKeyValueStore, GuardedOAuthClient, ServerState};
use crate::oauth::SpotifyTokens;

pub const TOKENS_PATH: &str = "tokens";

#[derive(Deserialize, Debug)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RefreshParams {
    refresh_token: Option<String>,
}

/// Tokens as persisted in the key-value store.
#[derive(Serialize, Debug)]
struct StoredTokens<'a> {
    access_token: &'a str,
    refresh_token: Option<&'a str>,
    token_type: &'a str,
    scope: Option<&'a str>,
    expires_in: u64,
    obtained_at: String,
}

/// Best effort: a failed write is logged and the flow carries on.
async fn persist_tokens(
    store: &GuardedKeyValueStore,
    tokens: &SpotifyTokens,
    refresh_token: Option<&str>,
) {
    let stored = StoredTokens {
        access_token: &tokens.access_token,
        refresh_token,
        token_type: &tokens.token_type,
        scope: tokens.scope.as_deref(),
        expires_in: tokens.expires_in,
        obtained_at: chrono::Utc::now().to_rfc3339(),
    };

    let value = match serde_json::to_value(&stored) {
        Ok(value) => value,
        Err(err) => {
            warn!("Failed to serialize tokens: {}", err);
            return;
        }
    };
    if let Err(err) = store.set(TOKENS_PATH, value).await {
        warn!("Failed to persist tokens: {:#}", err);
    }
}

/// `<frontend>/#access_token=..&refresh_token=..&expires_in=..`
fn frontend_redirect(frontend_uri: &str, tokens: &SpotifyTokens) -> String {
    format!(
        "{}/#access_token={}&refresh_token={}&expires_in={}",
        frontend_uri.trim_end_matches('/'),
        urlencoding::encode(&tokens.access_token),
        urlencoding::encode(tokens.refresh_token.as_deref().unwrap_or_default()),
        tokens.expires_in
    )
}

async fn login(State(oauth): State<GuardedOAuthClient>) -> Redirect {
    Redirect::temporary(&oauth.authorize_url())
}

async fn callback(
    State(state): State<ServerState>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        warn!("Authorization was not granted: {}", error);
        return Err(ApiError::InvalidPayload(error));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingParameter("code"))?;

    let tokens = state.oauth.exchange_code(&code).await?;
    info!("Authorization code exchanged");

    persist_tokens(&state.store, &tokens, tokens.refresh_token.as_deref()).await;

    let target = frontend_redirect(state.oauth.frontend_uri(), &tokens);
    Ok(Redirect::to(&target).into_response())
}

async fn refresh(
    State(state): State<ServerState>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<SpotifyTokens>, ApiError> {
    let refresh_token = params
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingParameter("refresh_token"))?;

    let tokens = state.oauth.refresh(&refresh_token).await?;
    info!("Access token refreshed");

    // Spotify only sometimes rotates the refresh token
    let kept = tokens.refresh_token.as_deref().unwrap_or(&refresh_token);
    persist_tokens(&state.store, &tokens, Some(kept)).await;

    Ok(Json(tokens))
}

pub fn make_auth_routes(state: ServerState) -> Router {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/refresh", get(refresh))
        .with_state(state)
}
