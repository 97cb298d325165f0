use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use protocol::{ErrorBody, MESSAGE_REQUIRED, UPSTREAM_FAILED};
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Chat route errors.
///
/// Client-facing bodies are fixed strings; detail stays in the logs.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("message is required")]
    MissingMessage,
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("upstream generation failed: {0}")]
    Upstream(#[from] UpstreamError),
}

pub const INVALID_BODY: &str = "Request body must be a JSON object with a message field";

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingMessage => (StatusCode::BAD_REQUEST, MESSAGE_REQUIRED),
            Self::InvalidBody(_) => (StatusCode::BAD_REQUEST, INVALID_BODY),
            Self::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILED),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
