//! Background job: periodic agent availability checking.
//!
//! On each tick the checker GETs the availability API, reads the agent
//! count for the configured API name out of the JSON (0 when the key is
//! absent), and appends a `Timestamp,APIName,AvailableAgents` row to the
//! log file, writing the header when the file is new. Failures are
//! recorded as rows too, so gaps in coverage stay visible in the log:
//! `Connection Error`, `Invalid JSON Response`, or `Unknown Error`.
//!
//! The default interval is 15 minutes.

use std::fs::OpenOptions;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::time;
use tracing::{error, info};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("could not connect to the availability API: {0}")]
    Connection(String),

    #[error("could not parse the availability response: {0}")]
    InvalidJson(String),

    #[error("unexpected availability payload: {0}")]
    Unknown(String),
}

impl CheckError {
    /// Log-row value recorded in place of an agent count.
    pub fn row_value(&self) -> &'static str {
        match self {
            CheckError::Connection(_) => "Connection Error",
            CheckError::InvalidJson(_) => "Invalid JSON Response",
            CheckError::Unknown(_) => "Unknown Error",
        }
    }
}

/// One line of the availability log.
#[derive(Debug, Serialize)]
pub struct AvailabilityRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "APIName")]
    pub api_name: String,
    #[serde(rename = "AvailableAgents")]
    pub available_agents: String,
}

pub struct AvailabilityChecker {
    client: reqwest::Client,
}

impl AvailabilityChecker {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Run the check once and append the outcome to the log file.
    pub async fn run_check(&self, cfg: &Config) -> anyhow::Result<()> {
        info!("Running agent availability check...");

        let value = match self.fetch_available_agents(cfg).await {
            Ok(count) => {
                info!("Successfully fetched data. Available agents: {}", count);
                count
            }
            Err(e) => {
                error!("{}", e);
                e.row_value().to_string()
            }
        };

        append_row(&cfg.availability_log, &cfg.availability_api_name, &value)
    }

    /// GETs the availability API and extracts the agent count for the
    /// configured API name. A missing key counts as 0 available agents.
    async fn fetch_available_agents(&self, cfg: &Config) -> Result<String, CheckError> {
        let resp = self
            .client
            .get(&cfg.availability_url)
            .send()
            .await
            .map_err(|e| CheckError::Connection(e.to_string()))?
            .error_for_status()
            .map_err(|e| CheckError::Connection(e.to_string()))?;

        let body = resp
            .text()
            .await
            .map_err(|e| CheckError::Connection(e.to_string()))?;

        let data: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| CheckError::InvalidJson(e.to_string()))?;

        let map = data
            .as_object()
            .ok_or_else(|| CheckError::Unknown(format!("expected a JSON object, got: {}", data)))?;

        let count = map
            .get(&cfg.availability_api_name)
            .cloned()
            .unwrap_or_else(|| 0.into());

        Ok(match count {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
    }
}

impl Default for AvailabilityChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep checking on the configured interval. The first check fires
/// immediately; a failed check is logged and the loop continues.
pub async fn watch(cfg: &Config) -> anyhow::Result<()> {
    let checker = AvailabilityChecker::new();
    let mut interval = time::interval(Duration::from_secs(cfg.check_interval_secs));
    loop {
        interval.tick().await;
        if let Err(e) = checker.run_check(cfg).await {
            error!("availability check failed: {}", e);
        }
    }
}

/// Appends one record, writing the `Timestamp,APIName,AvailableAgents`
/// header only when the file does not exist yet.
fn append_row(path: &str, api_name: &str, value: &str) -> anyhow::Result<()> {
    let write_header = !Path::new(path).exists();

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);

    writer.serialize(AvailabilityRecord {
        timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        api_name: api_name.to_string(),
        available_agents: value.to_string(),
    })?;
    writer.flush()?;

    if write_header {
        info!("Created new log file: {}", path);
    }
    Ok(())
}
