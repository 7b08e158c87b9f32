use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub http_timeout_sec: Option<u64>,

    // Collaborators
    pub spotify: Option<SpotifyConfig>,
    pub sheets: Option<SheetsConfig>,
    pub firebase: Option<FirebaseConfig>,
    pub voting: Option<VotingConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub frontend_uri: Option<String>,
    pub scopes: Option<Vec<String>>,
    /// Base URL of the accounts service, only overridden in tests.
    pub accounts_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    /// Spreadsheet holding the extra tracks, defaults to `spreadsheet_id`.
    pub extra_spreadsheet_id: Option<String>,
    /// Inline service account JSON or path to the JSON file.
    pub service_account: Option<String>,
    pub roster_range: Option<String>,
    pub ledger_range: Option<String>,
    pub clear_range: Option<String>,
    pub extra_range: Option<String>,
    pub api_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FirebaseConfig {
    pub database_url: Option<String>,
    /// Inline service account JSON or path to the JSON file.
    pub service_account: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct VotingConfig {
    pub fill_missing_votes: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
