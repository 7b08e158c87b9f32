//! Google service-account authentication.
//!
//! Both the spreadsheet and the key-value store collaborators authenticate
//! with a service account. The account key signs a short-lived JWT which is
//! traded for an OAuth2 access token at the account's token URI
//! (JWT-bearer grant). Tokens are cached until shortly before they expire.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const SHEETS_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];
pub const FIREBASE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/firebase.database",
    "https://www.googleapis.com/auth/userinfo.email",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Cached tokens are dropped this long before their real expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The subset of a Google service account JSON key the relay needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Something able to hand out a bearer token for outbound Google requests.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Fixed token, for collaborators that don't need a real grant (local fakes).
pub struct StaticTokenSource(pub String);

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

fn build_claims(key: &ServiceAccountKey, scopes: &str, now: i64) -> JwtClaims {
    JwtClaims {
        iss: key.client_email.clone(),
        scope: scopes.to_string(),
        aud: key.token_uri.clone(),
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Clone, Debug)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        now + EXPIRY_MARGIN_SECS < self.expires_at
    }
}

/// Access tokens minted from a service account key.
pub struct ServiceAccountTokenSource {
    client: reqwest::Client,
    key: ServiceAccountKey,
    scopes: String,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey, scopes: &[&str], timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            key,
            scopes: scopes.join(" "),
            cached: RwLock::new(None),
        })
    }

    async fn fetch_token(&self, now: i64) -> Result<CachedToken> {
        let claims = build_claims(&self.key, &self.scopes, now);
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .context("Invalid service account private key")?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .context("Failed to sign service account assertion")?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await
            .context("Failed to reach Google token endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Google token request failed with status {}: {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Google token response")?;

        debug!(
            "Obtained access token for {} (expires in {:?}s)",
            self.key.client_email, token.expires_in
        );

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS),
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        {
            let guard = self.cached.read().await;
            if let Some(token) = guard.as_ref().filter(|t| t.is_fresh(now)) {
                return Ok(token.value.clone());
            }
        }

        let mut guard = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }
        let token = self.fetch_token(now).await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }
}
