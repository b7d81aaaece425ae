use serde::Deserialize;

/// Contents-API URL of the relayed file. Overridable via
/// CSV_RELAY_UPSTREAM_URL, but the service always serves exactly one file.
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://api.github.com/repos/Bosch-Rexroth-OCS/agent-check/contents/result.csv";

/// Status endpoint polled by the availability checker.
pub const DEFAULT_AVAILABILITY_URL: &str = "https://cx.bosch-so.com/rexroth-chat-DC-ready";

/// JSON key holding the agent count in the availability response.
pub const DEFAULT_AVAILABILITY_API_NAME: &str = "GP_Bosch_Rexroth_Chat_DC_VAG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// GitHub personal access token sent upstream on every fetch.
    pub github_token: String,
    pub upstream_url: String,
    pub availability_url: String,
    pub availability_api_name: String,
    /// Path of the CSV file the checker appends to.
    pub availability_log: String,
    /// Seconds between availability checks in watch mode. Default: 900.
    pub check_interval_secs: u64,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let github_token = std::env::var("GITHUB_PAT").unwrap_or_default();
    if github_token.is_empty() {
        // Sent as-is anyway; GitHub rejects the request and the caller
        // sees the generic error.
        tracing::warn!("GITHUB_PAT is not set — upstream requests will be rejected");
    }

    Ok(Config {
        port: std::env::var("CSV_RELAY_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .unwrap_or(8080),
        github_token,
        upstream_url: std::env::var("CSV_RELAY_UPSTREAM_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.into()),
        availability_url: std::env::var("CSV_RELAY_AVAILABILITY_URL")
            .unwrap_or_else(|_| DEFAULT_AVAILABILITY_URL.into()),
        availability_api_name: std::env::var("CSV_RELAY_API_NAME")
            .unwrap_or_else(|_| DEFAULT_AVAILABILITY_API_NAME.into()),
        availability_log: std::env::var("CSV_RELAY_AVAILABILITY_LOG")
            .unwrap_or_else(|_| "agent_availability_log.csv".into()),
        check_interval_secs: std::env::var("CSV_RELAY_CHECK_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(900),
    })
}
