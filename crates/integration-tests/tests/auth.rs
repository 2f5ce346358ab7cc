//! Login, logout, dashboards and admin analytics.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use edgpt_integration_tests::TestApp;
use serde_json::json;

const ADMIN_EMAIL: &str = "admin@edgpt.ai";
const CUSTOMER_EMAIL: &str = "owner@lawfirm.com";
const PASSWORD: &str = "correct horse battery";

#[tokio::test]
async fn test_login_page_renders() {
    let app = TestApp::new();

    let response = app.get("edgpt.ai", "/login", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("username"));
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = TestApp::new();

    let response = app.post_form("/login", "username=&password=").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({ "error": "Username and password are required" })
    );
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.create_user(CUSTOMER_EMAIL, PASSWORD, false).await;

    let response = app
        .post_form("/login", "username=owner%40lawfirm.com&password=wrong-password")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json(), json!({ "error": "Invalid credentials" }));
    assert!(response.session_cookie().is_none());
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::new();

    let response = app
        .post_form("/login", "username=nobody%40edgpt.ai&password=whatever1")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_login_lands_on_dashboard() {
    let app = TestApp::new();
    app.create_user(CUSTOMER_EMAIL, PASSWORD, false).await;

    let body = format!(
        "username={}&password={}",
        edgpt_integration_tests::encode(CUSTOMER_EMAIL),
        edgpt_integration_tests::encode(PASSWORD)
    );
    let response = app.post_form("/login", &body).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/dashboard"));

    let cookie = response.session_cookie().unwrap();
    let dashboard = app.get("lawfirmgpt.ai", "/dashboard", Some(&cookie)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains(CUSTOMER_EMAIL));
}

#[tokio::test]
async fn test_dashboard_requires_login() {
    let app = TestApp::new();

    let response = app.get("edgpt.ai", "/dashboard", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_customer_cannot_open_admin_dashboard() {
    let app = TestApp::new();
    app.create_user(CUSTOMER_EMAIL, PASSWORD, false).await;
    let cookie = app.login(CUSTOMER_EMAIL, PASSWORD).await;

    let page = app.get("edgpt.ai", "/admin/dashboard", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/login"));

    let api = app.get("edgpt.ai", "/api/analytics", Some(&cookie)).await;
    assert_eq!(api.status, StatusCode::UNAUTHORIZED);
    assert_eq!(api.json(), json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_admin_dashboard_shows_signups() {
    let app = TestApp::new();
    app.create_user(ADMIN_EMAIL, PASSWORD, true).await;
    app.post_form("/signup", "email=lead%40cpafirm.com&website_url=https%3A%2F%2Fcpa.example&business_name=Numbers+LLC")
        .await;

    let cookie = app.login(ADMIN_EMAIL, PASSWORD).await;
    let response = app.get("edgpt.ai", "/admin/dashboard", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("lead@cpafirm.com"));
    assert!(response.body.contains("Numbers LLC"));
    assert!(response.body.contains("businessbrokergpt.ai"));
}

#[tokio::test]
async fn test_analytics_requires_admin() {
    let app = TestApp::new();

    let response = app.get("edgpt.ai", "/api/analytics", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json(), json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_analytics_summary() {
    let app = TestApp::new();
    app.create_user(ADMIN_EMAIL, PASSWORD, true).await;

    app.get("lawfirmgpt.ai", "/", None).await;
    app.get("lawfirmgpt.ai", "/", None).await;
    app.get("cpafirm.ai", "/", None).await;
    app.store
        .insert_page_view_at("cpafirm.ai", "/", Utc::now() - Duration::days(45));
    app.post_form("/signup", "email=a%40b.com&website_url=http%3A%2F%2Fx.com")
        .await;

    let cookie = app.login(ADMIN_EMAIL, PASSWORD).await;
    let response = app.get("edgpt.ai", "/api/analytics", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(
        json["domain_views"],
        json!([
            { "domain": "lawfirmgpt.ai", "views": 2 },
            { "domain": "cpafirm.ai", "views": 1 },
        ])
    );
    assert_eq!(json["daily_views"].as_array().unwrap().len(), 1);
    assert_eq!(json["daily_views"][0]["views"], 3);
    assert_eq!(json["trial_signups"], 1);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::new();
    app.create_user(CUSTOMER_EMAIL, PASSWORD, false).await;
    let cookie = app.login(CUSTOMER_EMAIL, PASSWORD).await;

    let logout = app.get("edgpt.ai", "/logout", Some(&cookie)).await;
    assert_eq!(logout.status, StatusCode::SEE_OTHER);
    assert_eq!(logout.location(), Some("/"));

    let dashboard = app.get("edgpt.ai", "/dashboard", Some(&cookie)).await;
    assert_eq!(dashboard.status, StatusCode::SEE_OTHER);
    assert_eq!(dashboard.location(), Some("/login"));
}

#[tokio::test]
async fn test_login_page_redirects_when_logged_in() {
    let app = TestApp::new();
    app.create_user(ADMIN_EMAIL, PASSWORD, true).await;
    let cookie = app.login(ADMIN_EMAIL, PASSWORD).await;

    let response = app.get("edgpt.ai", "/login", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/dashboard"));
}

#[tokio::test]
async fn test_admin_dashboard_store_failure_renders_branded_page() {
    let app = TestApp::new();
    app.create_user(ADMIN_EMAIL, PASSWORD, true).await;
    let cookie = app.login(ADMIN_EMAIL, PASSWORD).await;
    app.store.set_unavailable(true);

    let response = app
        .get("lawfirmgpt.ai", "/admin/dashboard", Some(&cookie))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        response.headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert!(response.body.contains("Something Went Wrong"));
    assert!(response.body.contains("LawFirmGPT"));
    assert!(!response.body.contains("PoolTimedOut"));
    assert!(!response.body.contains("Database error"));
}

#[tokio::test]
async fn test_api_store_failure_stays_json() {
    let app = TestApp::new();
    app.create_user(ADMIN_EMAIL, PASSWORD, true).await;
    let cookie = app.login(ADMIN_EMAIL, PASSWORD).await;
    app.store.set_unavailable(true);

    let response = app.get("edgpt.ai", "/api/analytics", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({ "error": "Internal server error" }));
}
