use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lineup_vote_relay::config::{AppConfig, CliConfig, FileConfig};
use lineup_vote_relay::google_auth::{
    ServiceAccountTokenSource, FIREBASE_SCOPES, SHEETS_SCOPES,
};
use lineup_vote_relay::oauth::SpotifyOAuthClient;
use lineup_vote_relay::server::ServerConfig;
use lineup_vote_relay::{
    run_server, FirebaseStore, GoogleSheetsClient, RequestsLoggingLevel, VotingService,
};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Its values override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8888)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Timeout in seconds for outbound HTTP requests.
    #[clap(long, default_value_t = 30)]
    pub http_timeout_sec: u64,

    #[clap(long, env = "SPOTIFY_CLIENT_ID")]
    pub client_id: Option<String>,

    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Must match the redirect URI registered with Spotify.
    #[clap(long, env = "SPOTIFY_REDIRECT_URI")]
    pub redirect_uri: Option<String>,

    /// Where the voting frontend is served; tokens are handed back there.
    #[clap(long, env = "FRONTEND_URI")]
    pub frontend_uri: Option<String>,

    #[clap(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    #[clap(long, env = "FIREBASE_DATABASE_URL")]
    pub firebase_database_url: Option<String>,

    /// Service account JSON, inline or as a path to the key file.
    #[clap(long, env = "FIREBASE_SERVICE_ACCOUNT", hide_env_values = true)]
    pub firebase_service_account: Option<String>,

    /// Service account JSON, inline or as a path to the key file.
    #[clap(long, env = "SHEETS_SERVICE_ACCOUNT", hide_env_values = true)]
    pub sheets_service_account: Option<String>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            logging_level: self.logging_level.clone(),
            http_timeout_sec: self.http_timeout_sec,
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
            frontend_uri: self.frontend_uri.clone(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            firebase_database_url: self.firebase_database_url.clone(),
            firebase_service_account: self.firebase_service_account.clone(),
            sheets_service_account: self.sheets_service_account.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let firebase_tokens = Arc::new(ServiceAccountTokenSource::new(
        config.firebase.service_account.clone(),
        FIREBASE_SCOPES,
        config.http_timeout_sec,
    )?);
    let store = Arc::new(FirebaseStore::new(
        config.firebase.database_url.clone(),
        firebase_tokens,
        config.http_timeout_sec,
    )?);
    info!("Using Firebase database at {}", config.firebase.database_url);

    let sheets_tokens = Arc::new(ServiceAccountTokenSource::new(
        config.sheets.service_account.clone(),
        SHEETS_SCOPES,
        config.http_timeout_sec,
    )?);
    let sheets = Arc::new(GoogleSheetsClient::new(
        config.sheets.api_base_url.clone(),
        sheets_tokens,
        config.http_timeout_sec,
    )?);
    info!("Using spreadsheet {}", config.sheets.spreadsheet_id);

    let voting = Arc::new(VotingService::new(
        store.clone(),
        sheets,
        config.sheets.clone(),
        config.voting.clone(),
    ));
    let oauth = Arc::new(SpotifyOAuthClient::new(
        config.spotify.clone(),
        config.http_timeout_sec,
    )?);

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        frontend_uri: config.spotify.frontend_uri.clone(),
    };

    info!("Starting server on port {}...", config.port);
    run_server(server_config, store, voting, oauth).await
}
