//! Branded 404 page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
};

use edgpt_core::BrandConfig;

use crate::filters;
use crate::middleware::CurrentBrand;

#[derive(Template, WebTemplate)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub brand: BrandConfig,
}

/// Fallback for unknown routes.
pub async fn not_found(brand: CurrentBrand, uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), host = %brand.host, "No route");

    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            brand: brand.brand().clone(),
        },
    )
}
