//! Health endpoint tests.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use edgpt_integration_tests::TestApp;

#[tokio::test]
async fn test_health_lists_domains() {
    let app = TestApp::new();

    let response = app.get("edgpt.ai", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
    let domains: Vec<&str> = json["domains"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d.as_str())
        .collect();
    assert_eq!(
        domains,
        [
            "edgpt.ai",
            "gptsites.ai",
            "lawfirmgpt.ai",
            "cpafirm.ai",
            "taxprepgpt.ai",
            "businessbrokergpt.ai",
        ]
    );
}

#[tokio::test]
async fn test_readiness_follows_store() {
    let app = TestApp::new();

    let ready = app.get("edgpt.ai", "/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);

    app.store.set_unavailable(true);
    let down = app.get("edgpt.ai", "/health/ready", None).await;
    assert_eq!(down.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let app = TestApp::new();

    let response = app.get("edgpt.ai", "/health", None).await;
    let id = response.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(!id.is_empty());
}
