use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// The only message callers ever see on failure. Status codes, upstream
/// error text, and the token stay out of the response body.
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to fetch data from private repository.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("upstream responded with {status}: {status_text}")]
    UpstreamStatus { status: u16, status_text: String },

    /// DNS, connect, TLS, or body-read failure.
    #[error("upstream request failed: {0}")]
    Transport(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Error fetching from GitHub: {}", self);

        let body = Json(json!({ "error": GENERIC_ERROR_MESSAGE }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
