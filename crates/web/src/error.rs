//! Unified error handling with Sentry integration.
//!
//! Page handlers return [`AppError`] (plain-text body); JSON endpoints return
//! [`ApiError`], which wraps the same error and answers `{"error": "..."}`.
//! Server-side failures are captured to Sentry and never leak their detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use edgpt_core::{SignupError, WidgetError};

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Generic message for server-side failures.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Signup form failed validation.
    #[error("Signup error: {0}")]
    Signup(#[from] SignupError),

    /// Widget customization failed validation.
    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::MissingCredentials
                | AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Signup(_) | Self::Widget(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details are never included.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::MissingCredentials | AuthError::InvalidCredentials => err.to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_owned()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    INTERNAL_ERROR_MESSAGE.to_owned()
                }
            },
            Self::Signup(err) => err.to_string(),
            Self::Widget(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_owned(),
        }
    }

    /// Capture server errors to Sentry and the log.
    fn report(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        let status = self.status();
        let body = if status.is_client_error() {
            format!("Error: {}", self.public_message())
        } else {
            self.public_message()
        };
        (status, body).into_response()
    }
}

/// JSON flavour of [`AppError`] for API and form-post endpoints.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<SignupError> for ApiError {
    fn from(err: SignupError) -> Self {
        Self(err.into())
    }
}

impl From<WidgetError> for ApiError {
    fn from(err: WidgetError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.report();
        (
            self.0.status(),
            Json(json!({ "error": self.0.public_message() })),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
