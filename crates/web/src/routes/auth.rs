//! Login and logout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use edgpt_core::BrandConfig;

use crate::error::{ApiError, AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    ClientInfo, CurrentBrand, OptionalUser, clear_current_user, set_current_user,
};
use crate::models::CurrentUser;
use crate::services::analytics::log_page_view;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub brand: BrandConfig,
}

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Where a freshly logged-in user lands.
#[must_use]
pub const fn landing_path(user: &CurrentUser) -> &'static str {
    if user.is_admin {
        "/admin/dashboard"
    } else {
        "/dashboard"
    }
}

/// Display the login page.
///
/// Visitors who are already logged in go straight to their dashboard.
#[instrument(skip_all, fields(host = %brand.host))]
pub async fn login_page(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    brand: CurrentBrand,
    client: ClientInfo,
) -> Response {
    if let Some(user) = user {
        return Redirect::to(landing_path(&user)).into_response();
    }

    log_page_view(&state, &brand, client, "/login").await;

    LoginTemplate {
        brand: brand.brand().clone(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, ApiError> {
    let auth = AuthService::new(state.store());

    let user = match auth.login(&form.username, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, "Login failed");
            return Err(e.into());
        }
    };

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to store session");
        AppError::Internal(format!("session error: {e}"))
    })?;

    set_sentry_user(&current.id, Some(current.email.as_str()));
    tracing::info!(user_id = %current.id, is_admin = current.is_admin, "User logged in");

    Ok(Redirect::to(landing_path(&current)))
}

/// Log out and return to the landing page.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!(error = %e, "Failed to clear session");
    }
    clear_sentry_user();

    Redirect::to("/")
}
