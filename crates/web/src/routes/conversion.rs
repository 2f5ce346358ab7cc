//! Post-signup conversion page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use edgpt_core::BrandConfig;

use crate::filters;
use crate::middleware::{ClientInfo, CurrentBrand};
use crate::services::analytics::log_page_view;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "conversion.html")]
pub struct ConversionTemplate {
    pub brand: BrandConfig,
}

/// Display the conversion page shown after a successful signup.
#[instrument(skip_all, fields(host = %brand.host))]
pub async fn conversion(
    State(state): State<AppState>,
    brand: CurrentBrand,
    client: ClientInfo,
) -> ConversionTemplate {
    log_page_view(&state, &brand, client, "/conversion").await;

    ConversionTemplate {
        brand: brand.brand().clone(),
    }
}
