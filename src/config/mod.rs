mod file_config;

pub use file_config::{FileConfig, FirebaseConfig, SheetsConfig, SpotifyConfig, VotingConfig};

use crate::google_auth::ServiceAccountKey;
use crate::server::RequestsLoggingLevel;
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use std::path::Path;

pub const DEFAULT_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_ROSTER_RANGE: &str = "Artists!A1:C";
pub const DEFAULT_LEDGER_RANGE: &str = "Votes";
pub const DEFAULT_CLEAR_RANGE: &str = "Votes";
pub const DEFAULT_EXTRA_RANGE: &str = "Extra!A2:C";
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "playlist-read-private",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-modify-playback-state",
    "user-read-playback-state",
];

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub http_timeout_sec: u64,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub frontend_uri: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub firebase_database_url: Option<String>,
    pub firebase_service_account: Option<String>,
    pub sheets_service_account: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub http_timeout_sec: u64,
    pub spotify: SpotifySettings,
    pub sheets: SheetsSettings,
    pub firebase: FirebaseSettings,
    pub voting: VotingSettings,
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub frontend_uri: String,
    pub scopes: Vec<String>,
    pub accounts_base_url: String,
}

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub extra_spreadsheet_id: String,
    pub roster_range: String,
    pub ledger_range: String,
    pub clear_range: String,
    pub extra_range: String,
    pub api_base_url: String,
    pub service_account: ServiceAccountKey,
}

#[derive(Debug, Clone)]
pub struct FirebaseSettings {
    pub database_url: String,
    pub service_account: ServiceAccountKey,
}

#[derive(Debug, Clone)]
pub struct VotingSettings {
    /// Participants missing from a submission get a "no" vote.
    pub fill_missing_votes: bool,
}

impl Default for VotingSettings {
    fn default() -> Self {
        Self {
            fill_missing_votes: true,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let spotify_file = file.spotify.unwrap_or_default();
        let sheets_file = file.sheets.unwrap_or_default();
        let firebase_file = file.firebase.unwrap_or_default();
        let voting_file = file.voting.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());
        let http_timeout_sec = file.http_timeout_sec.unwrap_or(cli.http_timeout_sec);

        let spotify = SpotifySettings {
            client_id: required(spotify_file.client_id, &cli.client_id, "client_id")?,
            client_secret: required(
                spotify_file.client_secret,
                &cli.client_secret,
                "client_secret",
            )?,
            redirect_uri: required(spotify_file.redirect_uri, &cli.redirect_uri, "redirect_uri")?,
            frontend_uri: required(spotify_file.frontend_uri, &cli.frontend_uri, "frontend_uri")?,
            scopes: spotify_file
                .scopes
                .unwrap_or_else(|| DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()),
            accounts_base_url: spotify_file
                .accounts_base_url
                .unwrap_or_else(|| DEFAULT_ACCOUNTS_BASE_URL.to_string()),
        };

        let spreadsheet_id =
            required(sheets_file.spreadsheet_id, &cli.spreadsheet_id, "spreadsheet_id")?;
        let sheets_account = required(
            sheets_file.service_account,
            &cli.sheets_service_account,
            "sheets service_account",
        )?;
        let sheets = SheetsSettings {
            extra_spreadsheet_id: sheets_file
                .extra_spreadsheet_id
                .unwrap_or_else(|| spreadsheet_id.clone()),
            spreadsheet_id,
            roster_range: sheets_file
                .roster_range
                .unwrap_or_else(|| DEFAULT_ROSTER_RANGE.to_string()),
            ledger_range: sheets_file
                .ledger_range
                .unwrap_or_else(|| DEFAULT_LEDGER_RANGE.to_string()),
            clear_range: sheets_file
                .clear_range
                .unwrap_or_else(|| DEFAULT_CLEAR_RANGE.to_string()),
            extra_range: sheets_file
                .extra_range
                .unwrap_or_else(|| DEFAULT_EXTRA_RANGE.to_string()),
            api_base_url: sheets_file
                .api_base_url
                .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE_URL.to_string()),
            service_account: load_service_account(&sheets_account)
                .context("Invalid sheets service account")?,
        };

        let firebase_account = required(
            firebase_file.service_account,
            &cli.firebase_service_account,
            "firebase service_account",
        )?;
        let firebase = FirebaseSettings {
            database_url: required(
                firebase_file.database_url,
                &cli.firebase_database_url,
                "firebase database_url",
            )?
            .trim_end_matches('/')
            .to_string(),
            service_account: load_service_account(&firebase_account)
                .context("Invalid firebase service account")?,
        };

        let voting = VotingSettings {
            fill_missing_votes: voting_file
                .fill_missing_votes
                .unwrap_or(VotingSettings::default().fill_missing_votes),
        };

        Ok(Self {
            port,
            logging_level,
            http_timeout_sec,
            spotify,
            sheets,
            firebase,
            voting,
        })
    }
}

/// Picks the TOML value, then the CLI/env value. Blank strings count as missing.
fn required(file_value: Option<String>, cli_value: &Option<String>, name: &str) -> Result<String> {
    file_value
        .or_else(|| cli_value.clone())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("{} must be specified via CLI, environment or config file", name))
}

/// A service account value is either the JSON blob itself or a path to it.
pub fn load_service_account(value: &str) -> Result<ServiceAccountKey> {
    let trimmed = value.trim();
    let json = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        std::fs::read_to_string(Path::new(trimmed))
            .with_context(|| format!("Failed to read service account file: {}", trimmed))?
    };
    serde_json::from_str(&json).context("Failed to parse service account JSON")
}

/// Parses a logging level string into RequestsLoggingLevel.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
