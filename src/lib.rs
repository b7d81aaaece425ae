//! csv-relay — library crate for integration testing.
//!
//! Re-exports modules needed by integration tests in `tests/`.

pub mod cli;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod relay;
pub mod upstream;

/// Shared application state passed to handlers.
pub struct AppState {
    pub upstream: upstream::UpstreamClient,
    pub config: config::Config,
}
