//! Integration tests for the scan service client
//!
//! These tests run the client against a local mock server and verify
//! request shape, response classification, retry counts and backoff timing.

use mockito::Matcher;
use nfce_migrator::adapters::scan::{RetryPolicy, ScanService, SubmissionClient};
use nfce_migrator::config::ApiConfig;
use nfce_migrator::domain::{FailureKind, MigratorError, Outcome};
use serde_json::json;
use std::time::{Duration, Instant};

const SCAN_PATH: &str = "/api/scan/process";
const STATUS_PATH: &str = "/api/status";
const QR_URL: &str = "https://www.sefaz.mt.gov.br/nfce/consultanfce?p=ABC|2|1|000001|SIG";

fn api_config(base_url: String) -> ApiConfig {
    ApiConfig {
        base_url,
        submit_timeout_secs: 5,
        health_timeout_secs: 5,
        ..ApiConfig::default()
    }
}

fn client(base_url: String, max_retries: u32, delay_ms: u64) -> SubmissionClient {
    SubmissionClient::new(
        &api_config(base_url),
        RetryPolicy::new(max_retries, Duration::from_millis(delay_ms)),
        false,
    )
    .unwrap()
}

#[tokio::test]
async fn test_submit_success_sends_qr_code() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", SCAN_PATH)
        .match_header("user-agent", "NFC-e-Migration/1.0")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "qrCode": QR_URL })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "message": "Nota processada", "salva": {"status": "salva"}}"#)
        .expect(1)
        .create_async()
        .await;

    let outcome = client(server.url(), 3, 10).submit(QR_URL).await;

    assert_eq!(
        outcome,
        Outcome::Success {
            simulated: false,
            message: Some("Nota processada".to_string())
        }
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_duplicate() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", SCAN_PATH)
        .with_status(200)
        .with_body(r#"{"success": true, "salva": {"status": "duplicada", "message": "Nota ja existe"}}"#)
        .expect(1)
        .create_async()
        .await;

    let outcome = client(server.url(), 3, 10).submit(QR_URL).await;

    assert_eq!(
        outcome,
        Outcome::Duplicate {
            message: Some("Nota ja existe".to_string())
        }
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejection_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", SCAN_PATH)
        .with_status(200)
        .with_body(r#"{"success": false, "error": "Assinatura invalida"}"#)
        .expect(1)
        .create_async()
        .await;

    let outcome = client(server.url(), 3, 10).submit(QR_URL).await;

    assert_eq!(outcome, Outcome::rejected("Assinatura invalida"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_retry_with_backoff() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", SCAN_PATH)
        .with_status(500)
        .with_body("boom")
        .expect(4)
        .create_async()
        .await;

    let started = Instant::now();
    let outcome = client(server.url(), 3, 20).submit(QR_URL).await;
    let elapsed = started.elapsed();

    assert_eq!(
        outcome,
        Outcome::Failure {
            kind: FailureKind::RetriesExhausted,
            reason: "HTTP 500: boom".to_string()
        }
    );
    // 20 + 40 + 80 ms of backoff, none after the last attempt
    assert!(elapsed >= Duration::from_millis(140), "elapsed {elapsed:?}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_success_after_retries_stops_retrying() {
    let mut server = mockito::Server::new_async().await;
    // Two failures are served first, then the service recovers
    let failing = server
        .mock("POST", SCAN_PATH)
        .with_status(500)
        .with_body("warming up")
        .expect(2)
        .create_async()
        .await;
    let recovered = server
        .mock("POST", SCAN_PATH)
        .with_status(200)
        .with_body(r#"{"success": true, "message": "Nota processada"}"#)
        .expect(1)
        .create_async()
        .await;

    let outcome = client(server.url(), 3, 10).submit(QR_URL).await;

    assert_eq!(
        outcome,
        Outcome::Success {
            simulated: false,
            message: Some("Nota processada".to_string())
        }
    );
    failing.assert_async().await;
    recovered.assert_async().await;
}

#[tokio::test]
async fn test_zero_retries_makes_one_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", SCAN_PATH)
        .with_status(503)
        .with_body("unavailable")
        .expect(1)
        .create_async()
        .await;

    let outcome = client(server.url(), 0, 1000).submit(QR_URL).await;

    assert!(matches!(
        outcome,
        Outcome::Failure {
            kind: FailureKind::RetriesExhausted,
            ..
        }
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unparseable_body_is_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", SCAN_PATH)
        .with_status(200)
        .with_body("<html>proxy error</html>")
        .expect(2)
        .create_async()
        .await;

    let outcome = client(server.url(), 1, 5).submit(QR_URL).await;

    match outcome {
        Outcome::Failure { kind, reason } => {
            assert_eq!(kind, FailureKind::RetriesExhausted);
            assert!(reason.starts_with("Unexpected response body"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_exhausts_retries() {
    let outcome = client("http://127.0.0.1:9".to_string(), 1, 5)
        .submit(QR_URL)
        .await;

    match outcome {
        Outcome::Failure { kind, reason } => {
            assert_eq!(kind, FailureKind::RetriesExhausted);
            assert!(!reason.is_empty());
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dry_run_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let scan = server
        .mock("POST", SCAN_PATH)
        .expect(0)
        .create_async()
        .await;

    let client = SubmissionClient::new(
        &api_config(server.url()),
        RetryPolicy::default(),
        true,
    )
    .unwrap();

    assert!(client.is_dry_run());
    let outcome = client.submit(QR_URL).await;

    assert!(outcome.is_simulated());
    scan.assert_async().await;
}

#[tokio::test]
async fn test_health_check() {
    let mut server = mockito::Server::new_async().await;
    let healthy = server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_body(r#"{"status": "ok"}"#)
        .expect(1)
        .create_async()
        .await;

    client(server.url(), 3, 10).health_check().await.unwrap();
    healthy.assert_async().await;
}

#[tokio::test]
async fn test_health_check_unhealthy() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", STATUS_PATH)
        .with_status(503)
        .create_async()
        .await;

    let err = client(server.url(), 3, 10).health_check().await.unwrap_err();
    assert!(matches!(err, MigratorError::Remote(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_health_check_unreachable() {
    let err = client("http://127.0.0.1:9".to_string(), 3, 10)
        .health_check()
        .await
        .unwrap_err();
    assert!(matches!(err, MigratorError::Connection(_)));
}

#[tokio::test]
async fn test_api_status_document() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "online", "database": "connected", "notas": 1234}"#)
        .create_async()
        .await;

    let document = client(server.url(), 3, 10).api_status().await.unwrap();
    assert_eq!(document["status"], "online");
    assert_eq!(document["notas"], 1234);
}
