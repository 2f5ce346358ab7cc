//! Smoke tests against a running server.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`edgpt-cli migrate`)
//! - The web server running (`cargo run -p edgpt-web`)
//!
//! Run with: `EDGPT_TEST_URL=http://localhost:8082 cargo test -p edgpt-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode, redirect::Policy};
use serde_json::{Value, json};

/// Base URL of the server under test.
fn base_url() -> String {
    std::env::var("EDGPT_TEST_URL").unwrap_or_else(|_| "http://localhost:8082".to_string())
}

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_live_health() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_live_signup_redirects() {
    let resp = client()
        .post(format!("{}/signup", base_url()))
        .form(&[
            ("email", "smoke-test@edgpt.ai"),
            ("website_url", "https://smoke.example"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/conversion");
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_live_generate_code() {
    let resp = client()
        .post(format!("{}/api/generate-code", base_url()))
        .json(&json!({ "domain": "lawfirmgpt.ai", "customization": {} }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body["html"].as_str().unwrap().contains("LawFirmGPT"));
}
