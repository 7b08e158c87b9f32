//! Google Sheets v4 client (values API).

use super::trait_def::{Row, SpreadsheetClient, ValueInputOption};
use crate::google_auth::AccessTokenSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct GoogleSheetsClient {
    client: reqwest::Client,
    api_base_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

#[derive(Deserialize)]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Row>,
}

/// Cells normally arrive as formatted strings; anything else is stringified.
fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl GoogleSheetsClient {
    /// Create a new Sheets client.
    ///
    /// # Arguments
    /// * `api_base_url` - e.g. "https://sheets.googleapis.com/v4"
    /// * `tokens` - source of bearer tokens with the spreadsheets scope
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(
        api_base_url: impl Into<String>,
        tokens: Arc<dyn AccessTokenSource>,
        timeout_sec: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}{}",
            self.api_base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range),
            suffix
        )
    }

    async fn check(response: reqwest::Response, action: &str, range: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Sheets {} of {} failed with status {}: {}", action, range, status, body)
    }
}

#[async_trait]
impl SpreadsheetClient for GoogleSheetsClient {
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Row>> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(self.values_url(spreadsheet_id, range, ""))
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Failed to read range {}", range))?;
        let response = Self::check(response, "read", range).await?;

        let body: ValueRangeResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse values of {}", range))?;

        debug!("Read {} row(s) from {}", body.values.len(), range);
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Row>,
        input: ValueInputOption,
    ) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .put(self.values_url(spreadsheet_id, range, ""))
            .bearer_auth(token)
            .query(&[("valueInputOption", input.as_str())])
            .json(&ValueRangeBody {
                range,
                major_dimension: "ROWS",
                values: rows,
            })
            .send()
            .await
            .with_context(|| format!("Failed to update range {}", range))?;
        Self::check(response, "update", range).await?;
        Ok(())
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Row>,
        input: ValueInputOption,
    ) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .post(self.values_url(spreadsheet_id, range, ":append"))
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", input.as_str()),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&ValueRangeBody {
                range,
                major_dimension: "ROWS",
                values: rows,
            })
            .send()
            .await
            .with_context(|| format!("Failed to append to range {}", range))?;
        Self::check(response, "append", range).await?;
        Ok(())
    }

    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .post(self.values_url(spreadsheet_id, range, ":clear"))
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await
            .with_context(|| format!("Failed to clear range {}", range))?;
        Self::check(response, "clear", range).await?;
        Ok(())
    }
}
