//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use edgpt_core::{BrandConfig, LandingTemplate};

use crate::filters;
use crate::middleware::{ClientInfo, CurrentBrand};
use crate::services::analytics::log_page_view;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "landing/edgpt.html")]
pub struct EdGptLanding {
    pub brand: BrandConfig,
}

#[derive(Template, WebTemplate)]
#[template(path = "landing/gptsites.html")]
pub struct GptSitesLanding {
    pub brand: BrandConfig,
}

#[derive(Template, WebTemplate)]
#[template(path = "landing/lawfirmgpt.html")]
pub struct LawFirmGptLanding {
    pub brand: BrandConfig,
}

#[derive(Template, WebTemplate)]
#[template(path = "landing/cpafirm.html")]
pub struct CpaFirmLanding {
    pub brand: BrandConfig,
}

#[derive(Template, WebTemplate)]
#[template(path = "landing/taxprepgpt.html")]
pub struct TaxPrepGptLanding {
    pub brand: BrandConfig,
}

#[derive(Template, WebTemplate)]
#[template(path = "landing/businessbrokergpt.html")]
pub struct BusinessBrokerGptLanding {
    pub brand: BrandConfig,
}

/// Render the landing page variant for a template id.
#[must_use]
pub fn render_landing(template: LandingTemplate, brand: BrandConfig) -> Response {
    match template {
        LandingTemplate::EdGpt => EdGptLanding { brand }.into_response(),
        LandingTemplate::GptSites => GptSitesLanding { brand }.into_response(),
        LandingTemplate::LawFirmGpt => LawFirmGptLanding { brand }.into_response(),
        LandingTemplate::CpaFirm => CpaFirmLanding { brand }.into_response(),
        LandingTemplate::TaxPrepGpt => TaxPrepGptLanding { brand }.into_response(),
        LandingTemplate::BusinessBrokerGpt => BusinessBrokerGptLanding { brand }.into_response(),
    }
}

/// Display the branded landing page for the request host.
#[instrument(skip_all, fields(host = %brand.host))]
pub async fn home(State(state): State<AppState>, brand: CurrentBrand, client: ClientInfo) -> Response {
    log_page_view(&state, &brand, client, "/").await;

    tracing::info!(template = %brand.template(), brand = %brand.brand().key, "Serving landing page");
    render_landing(brand.template(), brand.brand().clone())
}
