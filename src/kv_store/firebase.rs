//! Firebase Realtime Database client (REST surface).

use super::trait_def::{path_segments, KeyValueStore};
use crate::google_auth::AccessTokenSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const ETAG_REQUEST_HEADER: &str = "X-Firebase-ETag";

/// Key-value store backed by a Firebase Realtime Database.
///
/// `set_if_absent` uses the database's conditional requests: the current
/// ETag is read together with the value and the write is sent with
/// `if-match`, so a concurrent writer makes the request fail with 412
/// instead of being overwritten.
pub struct FirebaseStore {
    client: reqwest::Client,
    database_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl FirebaseStore {
    /// Create a new store client.
    ///
    /// # Arguments
    /// * `database_url` - e.g. "https://my-project-default-rtdb.firebaseio.com"
    /// * `tokens` - source of bearer tokens for the database
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(
        database_url: impl Into<String>,
        tokens: Arc<dyn AccessTokenSource>,
        timeout_sec: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        let database_url = database_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            database_url,
            tokens,
        })
    }

    fn node_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path_segments(path)
            .into_iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("{}/{}.json", self.database_url, encoded.join("/"))
    }

    async fn put(&self, path: &str, value: &Value, etag: Option<&str>) -> Result<StatusCode> {
        let token = self.tokens.access_token().await?;
        let mut request = self
            .client
            .put(self.node_url(path))
            .query(&[("access_token", token.as_str())])
            .json(value);
        if let Some(etag) = etag {
            request = request.header(reqwest::header::IF_MATCH, etag);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to write '{}'", path))?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::PRECONDITION_FAILED {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Write of '{}' failed with status {}: {}", path, status, body);
        }
        Ok(status)
    }
}

/// Nulls and empty objects are how the database represents a missing node.
fn non_empty(value: Value) -> Option<Value> {
    match &value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(value),
    }
}

#[async_trait]
impl KeyValueStore for FirebaseStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(self.node_url(path))
            .query(&[("access_token", token.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to read '{}'", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Read of '{}' failed with status {}: {}", path, status, body);
        }

        let value: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse value at '{}'", path))?;
        Ok(non_empty(value))
    }

    async fn set(&self, path: &str, value: Value) -> Result<()> {
        self.put(path, &value, None).await?;
        Ok(())
    }

    async fn set_if_absent(&self, path: &str, value: Value) -> Result<bool> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(self.node_url(path))
            .query(&[("access_token", token.as_str())])
            .header(ETAG_REQUEST_HEADER, "true")
            .send()
            .await
            .with_context(|| format!("Failed to read '{}'", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Read of '{}' failed with status {}: {}", path, status, body);
        }

        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .with_context(|| format!("No ETag returned for '{}'", path))?;

        let current: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse value at '{}'", path))?;
        if non_empty(current).is_some() {
            return Ok(false);
        }

        let status = self.put(path, &value, Some(&etag)).await?;
        if status == StatusCode::PRECONDITION_FAILED {
            debug!("Conditional write of '{}' lost to a concurrent writer", path);
            return Ok(false);
        }
        Ok(true)
    }
}
