/// HTTP client for fetching the raw file from the GitHub contents API.
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};

use crate::errors::AppError;

/// Asks the contents API for the literal file bytes instead of the
/// JSON-wrapped metadata representation.
pub const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";

pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Fetches the file as text. Non-2xx statuses come back as
    /// `UpstreamStatus`; anything that keeps the request from completing
    /// comes back as `Transport`. No retries either way.
    pub async fn fetch_raw(&self, url: &str, token: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", token))
            .header(ACCEPT, RAW_ACCEPT)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Upstream request failed: {}", e);
                AppError::Transport(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        resp.text()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}
