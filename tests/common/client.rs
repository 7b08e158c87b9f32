//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per relay endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    /// Creates a client that does not follow redirects, so OAuth redirects
    /// can be inspected.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed")
    }

    async fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Misc Endpoints
    // ========================================================================

    pub async fn home(&self) -> Response {
        self.get("/").await
    }

    pub async fn ping(&self) -> Response {
        self.get("/ping").await
    }

    pub async fn test_firebase(&self) -> Response {
        self.get("/test-firebase").await
    }

    // ========================================================================
    // OAuth Endpoints
    // ========================================================================

    pub async fn login(&self) -> Response {
        self.get("/login").await
    }

    pub async fn callback(&self, code: &str) -> Response {
        self.get_with_query("/callback", &[("code", code)]).await
    }

    pub async fn callback_with_error(&self, error: &str) -> Response {
        self.get_with_query("/callback", &[("error", error)]).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Response {
        self.get_with_query("/refresh", &[("refresh_token", refresh_token)])
            .await
    }

    // ========================================================================
    // Voting Endpoints
    // ========================================================================

    pub async fn record_votes(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/record-votes"))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// Posts `body` verbatim as JSON, for malformed payloads.
    pub async fn record_votes_raw(&self, body: &str) -> Response {
        self.client
            .post(self.url("/record-votes"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn artist_info(&self) -> Response {
        self.get("/artist-info").await
    }

    pub async fn throb_count(&self, host: &str) -> Response {
        self.get_with_query("/throb-count", &[("host", host)]).await
    }

    pub async fn throb_count_without_host(&self) -> Response {
        self.get("/throb-count").await
    }

    pub async fn extra_tracks(&self) -> Response {
        self.get("/extra-tracks").await
    }

    pub async fn clear_sheet(&self) -> Response {
        self.client
            .post(self.url("/clear-sheet"))
            .send()
            .await
            .expect("Request failed")
    }
}
