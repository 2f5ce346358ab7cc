//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Branded landing page (by Host)
//! GET  /health              - Liveness + registered domains
//! GET  /health/ready        - Readiness (store ping)
//!
//! # Signup
//! GET  /signup              - Trial signup form
//! POST /signup              - Store trial request (form or JSON)
//! GET  /conversion          - Post-signup page
//!
//! # Auth
//! GET  /login               - Login page
//! POST /login               - Login action
//! GET  /logout              - Logout action
//!
//! # Dashboards (requires auth)
//! GET  /dashboard           - Customer dashboard
//! GET  /admin/dashboard     - Admin dashboard (admin only)
//!
//! # API
//! POST /api/generate-code   - Chat widget code generator
//! GET  /api/analytics       - 30 day traffic summary (admin only)
//! ```

pub mod api;
pub mod auth;
pub mod conversion;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod not_found;
pub mod signup;

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::middleware::{create_session_layer, request_id_middleware, server_error_page};
use crate::state::AppState;

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-code", post(api::generate_code))
        .route("/analytics", get(api::analytics))
}

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home::home))
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Signup funnel
        .route("/signup", get(signup::signup_page).post(signup::signup))
        .route("/conversion", get(conversion::conversion))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        // Dashboards
        .route("/dashboard", get(dashboard::dashboard))
        .route("/admin/dashboard", get(dashboard::admin_dashboard))
        // API
        .nest("/api", api_routes())
        .fallback(not_found::not_found)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the full application: routes, sessions, CORS, request ids and
/// tracing, bound to `state`.
///
/// Sentry layers are added by the binary so tests can drive the router
/// without a Sentry client.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());

    routes()
        .layer(from_fn_with_state(state.clone(), server_error_page))
        .layer(session_layer)
        .layer(cors_layer())
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}
