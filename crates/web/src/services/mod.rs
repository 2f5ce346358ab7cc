//! Business services used by route handlers.

pub mod analytics;
pub mod auth;
