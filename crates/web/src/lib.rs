//! EdGPT web service.
//!
//! Serves the branded landing page for each registered domain, collects trial
//! signups, authenticates customers and admins, and exposes the chat widget
//! code generator and admin analytics.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - `PostgreSQL` for accounts, trial requests, analytics and sessions
//! - Brand resolution by `Host` header against the immutable domain registry
//!
//! The binary in `main.rs` wires configuration, tracing and Sentry around
//! [`routes::app`]; the integration tests drive the same router in process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::WebConfig;
pub use routes::app;
pub use state::AppState;
