//! Authentication extractors.
//!
//! Page routes redirect anonymous visitors to `/login`; `/api/*` routes answer
//! 401 with a JSON error instead.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Error returned when a route needs a logged-in (or admin) user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl AuthRejection {
    fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin
        }
    }

    /// Pick the rejection from the full request path.
    ///
    /// Nested routers strip their prefix from `parts.uri`, so the original URI
    /// is preferred when the router recorded one.
    fn for_request(parts: &Parts) -> Self {
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |original| original.0.path());
        Self::for_path(path)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
        }
    }
}

async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session");
            None
        }
    }
}

/// Extractor that requires a logged-in user.
///
/// ```rust,ignore
/// async fn dashboard(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts)
            .await
            .map(Self)
            .ok_or_else(|| AuthRejection::for_request(parts))
    }
}

/// Extractor that requires a logged-in admin.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts)
            .await
            .filter(|user| user.is_admin)
            .map(Self)
            .ok_or_else(|| AuthRejection::for_request(parts))
    }
}

/// Extractor that optionally gets the current user.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await))
    }
}

/// Store the logged-in user, issuing a fresh session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Drop all session data and delete the session record (logout).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Request, Uri};

    use super::*;

    fn parts(uri: &str) -> Parts {
        Request::builder().uri(uri).body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_rejection_for_path() {
        assert_eq!(
            AuthRejection::for_path("/api/analytics"),
            AuthRejection::Unauthorized
        );
        assert_eq!(
            AuthRejection::for_path("/admin/dashboard"),
            AuthRejection::RedirectToLogin
        );
    }

    #[test]
    fn test_rejection_uses_original_uri_under_nested_router() {
        let mut nested = parts("/analytics");
        nested
            .extensions
            .insert(OriginalUri(Uri::from_static("/api/analytics")));
        assert_eq!(
            AuthRejection::for_request(&nested),
            AuthRejection::Unauthorized
        );

        assert_eq!(
            AuthRejection::for_request(&parts("/api/analytics")),
            AuthRejection::Unauthorized
        );
        assert_eq!(
            AuthRejection::for_request(&parts("/admin/dashboard")),
            AuthRejection::RedirectToLogin
        );
    }

    #[tokio::test]
    async fn test_require_admin_on_nested_api_path_is_unauthorized() {
        let mut nested = parts("/analytics");
        nested
            .extensions
            .insert(OriginalUri(Uri::from_static("/api/analytics")));
        let rejection = RequireAdmin::from_request_parts(&mut nested, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection, AuthRejection::Unauthorized);
    }

    #[test]
    fn test_rejection_responses() {
        let redirect = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect.headers()["location"], "/login");

        let unauthorized = AuthRejection::Unauthorized.into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
