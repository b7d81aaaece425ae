//! Integration tests for the availability checker.
//!
//! These tests verify:
//! 1. A successful check appends a row with the agent count pulled out of
//!    the JSON response, defaulting to 0 when the key is absent
//! 2. Connection failures, unparseable bodies, and non-object payloads are
//!    each recorded as their own error row instead of aborting the run
//! 3. The `Timestamp,APIName,AvailableAgents` header is written exactly
//!    once, when the log file is new
//!
//! The availability API is stood in for by a wiremock server; rows land in
//! a throwaway file under the system temp directory.

use std::fs;
use std::path::PathBuf;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use csv_relay::config::Config;
use csv_relay::jobs::availability::AvailabilityChecker;

const API_NAME: &str = "GP_Bosch_Rexroth_Chat_DC_VAG";

fn temp_log() -> PathBuf {
    std::env::temp_dir().join(format!("availability-{}.csv", uuid::Uuid::new_v4()))
}

fn test_config(availability_url: String, log: &PathBuf) -> Config {
    Config {
        port: 0,
        github_token: String::new(),
        upstream_url: String::new(),
        availability_url,
        availability_api_name: API_NAME.to_string(),
        availability_log: log.to_str().unwrap().to_string(),
        check_interval_secs: 900,
    }
}

#[tokio::test]
async fn successful_check_appends_agent_count_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!(r#"{{"{}": 3}}"#, API_NAME)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let log = temp_log();
    let cfg = test_config(format!("{}/status", mock_server.uri()), &log);

    AvailabilityChecker::new().run_check(&cfg).await.unwrap();

    let contents = fs::read_to_string(&log).unwrap();
    fs::remove_file(&log).unwrap();

    let mut lines = contents.lines();
    assert_eq!(lines.next().unwrap(), "Timestamp,APIName,AvailableAgents");
    let row = lines.next().unwrap();
    assert!(row.ends_with(&format!("{},3", API_NAME)), "row: {}", row);
    assert!(lines.next().is_none());
}

#[tokio::test]
async fn missing_count_key_defaults_to_zero() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"SomeOtherApi": 7}"#))
        .mount(&mock_server)
        .await;

    let log = temp_log();
    let cfg = test_config(mock_server.uri(), &log);

    AvailabilityChecker::new().run_check(&cfg).await.unwrap();

    let contents = fs::read_to_string(&log).unwrap();
    fs::remove_file(&log).unwrap();

    assert!(contents.lines().nth(1).unwrap().ends_with(",0"));
}

#[tokio::test]
async fn upstream_error_status_records_connection_error_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let log = temp_log();
    let cfg = test_config(mock_server.uri(), &log);

    AvailabilityChecker::new().run_check(&cfg).await.unwrap();

    let contents = fs::read_to_string(&log).unwrap();
    fs::remove_file(&log).unwrap();

    assert!(contents.contains("Connection Error"));
}

#[tokio::test]
async fn dead_endpoint_records_connection_error_row() {
    // Port 1 is never listening; the connect fails immediately.
    let log = temp_log();
    let cfg = test_config("http://127.0.0.1:1/status".to_string(), &log);

    AvailabilityChecker::new().run_check(&cfg).await.unwrap();

    let contents = fs::read_to_string(&log).unwrap();
    fs::remove_file(&log).unwrap();

    assert!(contents.contains("Connection Error"));
}

#[tokio::test]
async fn unparseable_body_records_invalid_json_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway timeout</html>"))
        .mount(&mock_server)
        .await;

    let log = temp_log();
    let cfg = test_config(mock_server.uri(), &log);

    AvailabilityChecker::new().run_check(&cfg).await.unwrap();

    let contents = fs::read_to_string(&log).unwrap();
    fs::remove_file(&log).unwrap();

    assert!(contents.contains("Invalid JSON Response"));
}

#[tokio::test]
async fn non_object_payload_records_unknown_error_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[1, 2, 3]"#))
        .mount(&mock_server)
        .await;

    let log = temp_log();
    let cfg = test_config(mock_server.uri(), &log);

    AvailabilityChecker::new().run_check(&cfg).await.unwrap();

    let contents = fs::read_to_string(&log).unwrap();
    fs::remove_file(&log).unwrap();

    assert!(contents.contains("Unknown Error"));
}

#[tokio::test]
async fn header_is_written_once_across_appends() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!(r#"{{"{}": 5}}"#, API_NAME)),
        )
        .mount(&mock_server)
        .await;

    let log = temp_log();
    let cfg = test_config(mock_server.uri(), &log);

    let checker = AvailabilityChecker::new();
    checker.run_check(&cfg).await.unwrap();
    checker.run_check(&cfg).await.unwrap();

    let contents = fs::read_to_string(&log).unwrap();
    fs::remove_file(&log).unwrap();

    let header_count = contents
        .lines()
        .filter(|l| *l == "Timestamp,APIName,AvailableAgents")
        .count();
    assert_eq!(header_count, 1);
    assert_eq!(contents.lines().count(), 3); // header + two rows
}
