//! Spotify OAuth2 client.
//!
//! This module handles the authorization-code flow against the Spotify
//! accounts service:
//! - Authorization URL generation
//! - Token exchange (authorization code for tokens)
//! - Access token refresh
//!
//! Client credentials are sent with HTTP Basic auth, parameters as a form body.

use base64::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SpotifySettings;

/// Tokens returned by the accounts service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpotifyTokens {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub expires_in: u64,
    /// Only present on code exchange, and on refresh when the provider rotates it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Error)]
pub enum OAuthError {
    /// The provider answered with an error; its body is kept verbatim.
    #[error("Token endpoint rejected the request (status {status})")]
    Rejected { status: u16, body: String },

    #[error("Token request failed: {0}")]
    Transport(String),

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

pub struct SpotifyOAuthClient {
    client: reqwest::Client,
    settings: SpotifySettings,
}

impl SpotifyOAuthClient {
    pub fn new(settings: SpotifySettings, timeout_sec: u64) -> Result<Self, OAuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .map_err(|e| OAuthError::Transport(e.to_string()))?;

        info!(
            "Spotify OAuth client configured for redirect URI {}",
            settings.redirect_uri
        );

        Ok(Self { client, settings })
    }

    pub fn frontend_uri(&self) -> &str {
        &self.settings.frontend_uri
    }

    fn base_url(&self) -> &str {
        self.settings.accounts_base_url.trim_end_matches('/')
    }

    /// URL the user is sent to in order to grant access.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/authorize?response_type=code&client_id={}&scope={}&redirect_uri={}",
            self.base_url(),
            urlencoding::encode(&self.settings.client_id),
            urlencoding::encode(&self.settings.scopes.join(" ")),
            urlencoding::encode(&self.settings.redirect_uri),
        )
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.settings.client_id, self.settings.client_secret
        );
        format!("Basic {}", BASE64_STANDARD.encode(credentials))
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<SpotifyTokens, OAuthError> {
        debug!("Exchanging authorization code");
        self.request_tokens(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.settings.redirect_uri),
        ])
        .await
    }

    /// Obtain a fresh access token from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SpotifyTokens, OAuthError> {
        debug!("Refreshing access token");
        self.request_tokens(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn request_tokens(&self, form: &[(&str, &str)]) -> Result<SpotifyTokens, OAuthError> {
        let url = format!("{}/api/token", self.base_url());
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.basic_auth_header())
            .form(form)
            .send()
            .await
            .map_err(|e| OAuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))
    }
}
