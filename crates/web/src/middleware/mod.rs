//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (reuse or generate `x-request-id`)
//! 4. CORS
//! 5. Session layer (tower-sessions)
//! 6. Branded 500 page for plain-text server errors

pub mod auth;
pub mod brand;
pub mod client;
pub mod error_page;
pub mod request_id;
pub mod session;

pub use auth::{
    AuthRejection, OptionalUser, RequireAdmin, RequireUser, clear_current_user, set_current_user,
};
pub use brand::CurrentBrand;
pub use client::ClientInfo;
pub use error_page::server_error_page;
pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, postgres_session_store};
