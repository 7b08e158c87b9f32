//! Error responses of the HTTP surface.
//!
//! Every error is rendered as `{"error": "<message>"}`, except rejected
//! OAuth requests whose provider body is passed through as-is.

use crate::oauth::OAuthError;
use crate::voting::VotingError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    #[error("{0}")]
    InvalidPayload(String),

    #[error("{body}")]
    UpstreamAuth { status: u16, body: String },

    #[error("{message}")]
    UpstreamRead {
        message: &'static str,
        cause: anyhow::Error,
    },

    #[error("{message}")]
    UpstreamWrite {
        message: &'static str,
        cause: anyhow::Error,
    },

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// Maps a voting failure, using `message` as the public text of upstream
    /// failures.
    pub fn from_voting(err: VotingError, message: &'static str) -> Self {
        match err {
            VotingError::InvalidPayload(reason) => ApiError::InvalidPayload(reason),
            VotingError::NoArtistData | VotingError::HostNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            VotingError::Read(cause) => ApiError::UpstreamRead { message, cause },
            VotingError::Write(cause) => ApiError::UpstreamWrite { message, cause },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_)
            | ApiError::InvalidPayload(_)
            | ApiError::UpstreamAuth { .. } => StatusCode::BAD_REQUEST,
            ApiError::UpstreamRead { .. } | ApiError::UpstreamWrite { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::Rejected { status, body } => ApiError::UpstreamAuth { status, body },
            other => ApiError::UpstreamRead {
                message: "Failed to contact the accounts service",
                cause: anyhow::Error::new(other),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::UpstreamAuth {
                status: upstream,
                body,
            } => {
                warn!("Token request rejected with status {}: {}", upstream, body);
                let content_type = if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                    "application/json"
                } else {
                    "text/plain; charset=utf-8"
                };
                (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            ApiError::UpstreamRead { message, cause }
            | ApiError::UpstreamWrite { message, cause } => {
                error!("{}: {:#}", message, cause);
                (status, Json(json!({ "error": message }))).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
