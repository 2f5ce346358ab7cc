//! Trial signup route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use edgpt_core::{BrandConfig, NewTrialRequest};

use crate::error::{ApiError, AppError};
use crate::filters;
use crate::middleware::{ClientInfo, CurrentBrand};
use crate::services::analytics::log_page_view;
use crate::state::AppState;

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub brand: BrandConfig,
}

/// Raw signup fields. Every field is optional so that missing values are
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupFields {
    pub email: Option<String>,
    pub website_url: Option<String>,
    pub business_name: Option<String>,
    pub phone: Option<String>,
}

impl SignupFields {
    fn parse(&self) -> Result<NewTrialRequest, edgpt_core::SignupError> {
        NewTrialRequest::parse(
            self.email.as_deref(),
            self.website_url.as_deref(),
            self.business_name.as_deref(),
            self.phone.as_deref(),
        )
    }
}

/// A signup submission, either a JSON body or an HTML form post.
///
/// Errors are answered in the same flavour the client sent.
#[derive(Debug)]
pub enum SignupSubmission {
    Json(SignupFields),
    Form(SignupFields),
}

impl SignupSubmission {
    const fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    const fn fields(&self) -> &SignupFields {
        match self {
            Self::Json(fields) | Self::Form(fields) => fields,
        }
    }

    fn reject(&self, err: impl Into<AppError>) -> Response {
        let err = err.into();
        if self.is_json() {
            ApiError(err).into_response()
        } else {
            err.into_response()
        }
    }
}

fn is_json_request(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"))
}

impl<S> FromRequest<S> for SignupSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json_request(&req) {
            let Json(fields) = Json::<SignupFields>::from_request(req, state)
                .await
                .map_err(|e| ApiError(AppError::BadRequest(e.body_text())).into_response())?;
            Ok(Self::Json(fields))
        } else {
            let Form(fields) = Form::<SignupFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()).into_response())?;
            Ok(Self::Form(fields))
        }
    }
}

/// Display the signup page.
#[instrument(skip_all, fields(host = %brand.host))]
pub async fn signup_page(
    State(state): State<AppState>,
    brand: CurrentBrand,
    client: ClientInfo,
) -> SignupTemplate {
    log_page_view(&state, &brand, client, "/signup").await;

    SignupTemplate {
        brand: brand.brand().clone(),
    }
}

/// Handle a signup submission.
///
/// Stores the trial request and redirects to the conversion page.
#[instrument(skip_all, fields(host = %brand.host))]
pub async fn signup(
    State(state): State<AppState>,
    brand: CurrentBrand,
    submission: SignupSubmission,
) -> Response {
    let request = match submission.fields().parse() {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected signup");
            return submission.reject(e);
        }
    };

    match state.store().create_trial_request(request).await {
        Ok(stored) => {
            tracing::info!(
                trial_request_id = %stored.id,
                email_domain = stored.email.domain(),
                "Trial request created"
            );
            Redirect::to("/conversion").into_response()
        }
        Err(e) => submission.reject(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    async fn extract(req: Request) -> Result<SignupSubmission, Response> {
        SignupSubmission::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_form_submission() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("email=a%40b.com&website_url=http%3A%2F%2Fx.com"))
            .unwrap();

        let submission = extract(req).await.unwrap();
        assert!(!submission.is_json());
        let parsed = submission.fields().parse().unwrap();
        assert_eq!(parsed.email.as_str(), "a@b.com");
        assert_eq!(parsed.website_url, "http://x.com");
        assert_eq!(parsed.business_name, None);
    }

    #[tokio::test]
    async fn test_json_submission() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json; charset=utf-8")
            .body(Body::from(
                r#"{"email":"a@b.com","website_url":"http://x.com","phone":"555-0100"}"#,
            ))
            .unwrap();

        let submission = extract(req).await.unwrap();
        assert!(submission.is_json());
        let parsed = submission.fields().parse().unwrap();
        assert_eq!(parsed.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let submission = extract(req).await.unwrap();
        assert!(submission.fields().parse().is_err());
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = extract(req).await.unwrap_err();
        assert!(response.status().is_client_error());
    }
}
