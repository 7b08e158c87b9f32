//! Test server lifecycle management
//!
//! Each test gets an isolated relay with its own in-memory stores, plus a
//! fake Spotify accounts service the relay talks to.

use super::constants::*;
use super::fixtures::{seed_participants, seed_spreadsheet};
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use base64::prelude::*;
use lineup_vote_relay::config::{
    SheetsSettings, SpotifySettings, VotingSettings, DEFAULT_CLEAR_RANGE, DEFAULT_EXTRA_RANGE,
    DEFAULT_LEDGER_RANGE, DEFAULT_ROSTER_RANGE, DEFAULT_SCOPES, DEFAULT_SHEETS_API_BASE_URL,
};
use lineup_vote_relay::google_auth::{ServiceAccountKey, DEFAULT_TOKEN_URI};
use lineup_vote_relay::oauth::SpotifyOAuthClient;
use lineup_vote_relay::server::{make_app, RequestsLoggingLevel, ServerConfig};
use lineup_vote_relay::{InMemoryKeyValueStore, InMemorySpreadsheet, VotingService};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Test server instance with isolated stores
///
/// When dropped, both the relay and the fake accounts service shut down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Key-value store for direct inspection in tests
    pub store: Arc<InMemoryKeyValueStore>,

    /// Spreadsheet for direct inspection in tests
    pub sheets: Arc<InMemorySpreadsheet>,

    // Private fields - keep resources alive until drop
    _shutdown_tx: Option<oneshot::Sender<()>>,
    _accounts_shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Deserialize)]
struct TokenForm {
    grant_type: String,
    code: Option<String>,
    refresh_token: Option<String>,
}

/// Minimal stand-in for `POST /api/token` of the Spotify accounts service.
async fn fake_token_endpoint(headers: HeaderMap, Form(form): Form<TokenForm>) -> Response {
    let expected_auth = format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{}:{}", CLIENT_ID, CLIENT_SECRET))
    );
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected_auth.as_str());
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_client"})),
        )
            .into_response();
    }

    match form.grant_type.as_str() {
        "authorization_code" if form.code.as_deref() == Some(VALID_CODE) => Json(json!({
            "access_token": ISSUED_ACCESS_TOKEN,
            "token_type": "Bearer",
            "scope": "user-read-private",
            "expires_in": 3600,
            "refresh_token": ISSUED_REFRESH_TOKEN,
        }))
        .into_response(),
        "refresh_token" if form.refresh_token.as_deref() == Some(VALID_REFRESH_TOKEN) => {
            Json(json!({
                "access_token": REFRESHED_ACCESS_TOKEN,
                "token_type": "Bearer",
                "scope": "user-read-private",
                "expires_in": 3600,
            }))
            .into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code",
            })),
        )
            .into_response(),
    }
}

async fn spawn_router(router: Router) -> (u16, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Server failed");
    });

    (port, shutdown_tx)
}

fn sheets_settings() -> SheetsSettings {
    SheetsSettings {
        spreadsheet_id: SPREADSHEET_ID.to_string(),
        extra_spreadsheet_id: SPREADSHEET_ID.to_string(),
        roster_range: DEFAULT_ROSTER_RANGE.to_string(),
        ledger_range: DEFAULT_LEDGER_RANGE.to_string(),
        clear_range: DEFAULT_CLEAR_RANGE.to_string(),
        extra_range: DEFAULT_EXTRA_RANGE.to_string(),
        api_base_url: DEFAULT_SHEETS_API_BASE_URL.to_string(),
        service_account: ServiceAccountKey {
            client_email: "relay@e2e.iam.gserviceaccount.com".to_string(),
            private_key: String::new(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            project_id: None,
        },
    }
}

impl TestServer {
    /// Spawns a relay with seeded sheets and participants on a random port.
    pub async fn spawn() -> Self {
        Self::spawn_with(VotingSettings::default()).await
    }

    /// Spawns a relay with the given voting settings.
    ///
    /// # Panics
    ///
    /// Panics if a port cannot be bound or the server doesn't become ready
    /// within the timeout.
    pub async fn spawn_with(voting_settings: VotingSettings) -> Self {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let sheets = Arc::new(InMemorySpreadsheet::new());
        seed_spreadsheet(&sheets);
        seed_participants(&store).await;

        let accounts = Router::new().route("/api/token", post(fake_token_endpoint));
        let (accounts_port, accounts_shutdown_tx) = spawn_router(accounts).await;

        let oauth = SpotifyOAuthClient::new(
            SpotifySettings {
                client_id: CLIENT_ID.to_string(),
                client_secret: CLIENT_SECRET.to_string(),
                redirect_uri: "http://localhost:8888/callback".to_string(),
                frontend_uri: FRONTEND_URI.to_string(),
                scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
                accounts_base_url: format!("http://127.0.0.1:{}", accounts_port),
            },
            REQUEST_TIMEOUT_SECS,
        )
        .expect("Failed to create OAuth client");

        let voting = VotingService::new(
            store.clone(),
            sheets.clone(),
            sheets_settings(),
            voting_settings,
        );

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port: 0,
            frontend_uri: FRONTEND_URI.to_string(),
        };
        let app = make_app(config, store.clone(), Arc::new(voting), Arc::new(oauth));
        let (port, shutdown_tx) = spawn_router(app).await;

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            port,
            store,
            sheets,
            _shutdown_tx: Some(shutdown_tx),
            _accounts_shutdown_tx: Some(accounts_shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Ledger content with trailing blanks trimmed.
    pub fn ledger(&self) -> Vec<Vec<String>> {
        self.sheets.rows(SPREADSHEET_ID, VOTES_SHEET)
    }

    /// Waits for the server to become ready by polling the /ping endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/ping", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        for tx in [self._shutdown_tx.take(), self._accounts_shutdown_tx.take()]
            .into_iter()
            .flatten()
        {
            let _ = tx.send(());
        }
    }
}

