use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use axum::{extract::State, middleware, routing::get, Router};
use serde_json::json;
use tower::ServiceBuilder;

use super::error::ApiError;
use super::http_layers::{cors_layer, log_requests};
use super::state::{GuardedKeyValueStore, GuardedOAuthClient, GuardedVotingService, ServerState};
use super::{make_auth_routes, make_vote_routes, ServerConfig};

const TEST_PATH: &str = "test";

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> String {
    format!(
        "Lineup vote relay is running (build {}, up {})",
        state.hash,
        format_uptime(state.start_time.elapsed())
    )
}

async fn ping() -> &'static str {
    "pong"
}

async fn test_firebase(State(store): State<GuardedKeyValueStore>) -> Result<String, ApiError> {
    let timestamp = chrono::Utc::now().to_rfc3339();
    store
        .set(
            TEST_PATH,
            json!({ "message": "Firebase connection test", "timestamp": timestamp }),
        )
        .await
        .map_err(|cause| ApiError::UpstreamWrite {
            message: "Failed to write to Firebase",
            cause,
        })?;
    Ok(format!("Test data written to Firebase at {}", timestamp))
}

pub fn make_app(
    config: ServerConfig,
    store: GuardedKeyValueStore,
    voting: GuardedVotingService,
    oauth: GuardedOAuthClient,
) -> Router {
    let state = ServerState::new(config.clone(), store, voting, oauth);

    let home_router: Router = Router::new()
        .route("/", get(home))
        .route("/ping", get(ping))
        .route("/test-firebase", get(test_firebase))
        .with_state(state.clone());

    home_router
        .merge(make_auth_routes(state.clone()))
        .merge(make_vote_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(state, log_requests))
                .layer(cors_layer(&config.frontend_uri)),
        )
}

pub async fn run_server(
    config: ServerConfig,
    store: GuardedKeyValueStore,
    voting: GuardedVotingService,
    oauth: GuardedOAuthClient,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, store, voting, oauth);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
