//! Request-level errors and their HTTP mapping
//!
//! Every error is answered as plain text. Upstream failures keep the upstream
//! status and body; transport problems are logged here and reach the caller
//! only as a fixed message.

use crate::upstream::UpstreamError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub const MISSING_FIELDS: &str = "Missing required fields: name, genre, releaseYear, developer";
pub const UPSTREAM_CONNECT_FAILED: &str = "Error connecting to the upstream API";
pub const GAME_FETCH_FAILED: &str = "Error fetching game data";
pub const UPSTREAM_TIMED_OUT: &str = "Upstream API did not respond in time";
pub const UPSTREAM_MALFORMED: &str = "Upstream API returned a malformed response";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{}", MISSING_FIELDS)]
    Validation,

    #[error("{body}")]
    Upstream { status: StatusCode, body: String },

    #[error("Game with name '{name}' not found")]
    NotFound { name: String },

    #[error("Invalid request")]
    InvalidRequest,

    #[error("{message}")]
    Transport { message: &'static str },

    #[error("{}", UPSTREAM_TIMED_OUT)]
    Timeout,

    #[error("{}", UPSTREAM_MALFORMED)]
    MalformedUpstream,
}

impl GatewayError {
    /// Log a failed upstream exchange and reduce it to a caller-facing error.
    /// `message` is what the caller sees for a transport failure.
    pub fn upstream_failure(err: UpstreamError, route: &'static str, message: &'static str) -> Self {
        match err {
            UpstreamError::Timeout { .. } => {
                tracing::error!(route, error = %err, "Upstream request timed out");
                GatewayError::Timeout
            }
            UpstreamError::Transport { .. } => {
                tracing::error!(route, error = %err, "{message}");
                GatewayError::Transport { message }
            }
        }
    }

    pub fn malformed_upstream(err: serde_json::Error, route: &'static str) -> Self {
        tracing::warn!(route, error = %err, "Upstream returned malformed JSON");
        GatewayError::MalformedUpstream
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation | GatewayError::InvalidRequest => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::MalformedUpstream => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
