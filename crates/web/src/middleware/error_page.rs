//! Branded page for server errors on HTML routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use edgpt_core::BrandConfig;

use crate::filters;
use crate::middleware::brand::request_host;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "500.html")]
pub struct ServerErrorTemplate {
    pub brand: BrandConfig,
}

/// Replace plain-text 500 responses with the branded error page.
///
/// JSON error bodies from API endpoints pass through unchanged.
pub async fn server_error_page(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let brand = state.registry().resolve(request_host(&parts)).clone();

    let response = next.run(Request::from_parts(parts, body)).await;

    if response.status() == StatusCode::INTERNAL_SERVER_ERROR && is_plain_text(&response) {
        return (StatusCode::INTERNAL_SERVER_ERROR, ServerErrorTemplate { brand }).into_response();
    }

    response
}

fn is_plain_text(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/plain"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Json;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plain_text_detection() {
        let text = (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        assert!(is_plain_text(&text));

        let json = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
            .into_response();
        assert!(!is_plain_text(&json));
    }

    #[test]
    fn test_template_shows_brand() {
        let registry = edgpt_core::DomainRegistry::builtin();
        let page = ServerErrorTemplate {
            brand: registry.resolve("cpafirm.ai").clone(),
        }
        .render()
        .unwrap();
        assert!(page.contains("Something Went Wrong"));
        assert!(page.contains("CPAFirm"));
    }
}
