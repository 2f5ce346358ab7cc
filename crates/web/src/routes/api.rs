//! JSON API handlers.
//!
//! Every error from this module is answered as `{"error": "..."}`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use edgpt_core::{
    ANALYTICS_WINDOW_DAYS, AnalyticsSummary, AnalyticsWindow, BrandConfig, CustomizationInput,
    WidgetCustomization, generate,
};

use crate::error::{ApiError, AppError};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Body of `POST /api/generate-code`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateCodeRequest {
    /// Registry key; the default brand is used when absent or unknown.
    pub domain: Option<String>,
    pub customization: CustomizationInput,
}

/// Generated widget code plus the brand and options it was built from.
#[derive(Debug, Serialize)]
pub struct GenerateCodeResponse {
    pub success: bool,
    pub html: String,
    pub css: String,
    pub config: BrandConfig,
    pub customization: WidgetCustomization,
}

/// Generate the embeddable chat widget for a brand.
#[instrument(skip_all)]
pub async fn generate_code(
    State(state): State<AppState>,
    body: Result<Json<GenerateCodeRequest>, JsonRejection>,
) -> Result<Json<GenerateCodeResponse>, ApiError> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let customization = request.customization.parse()?;
    let registry = state.registry();
    let domain = request
        .domain
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| registry.default_brand().key.as_str());

    if registry.brand(domain).is_none() {
        tracing::debug!(domain, "Unknown domain, generating default brand widget");
    }

    let widget = generate(registry, domain, &customization);
    tracing::info!(
        brand = %widget.brand.key,
        position = %customization.position,
        size = %customization.size,
        "Generated widget code"
    );

    Ok(Json(GenerateCodeResponse {
        success: true,
        html: widget.html,
        css: widget.css,
        config: widget.brand,
        customization,
    }))
}

/// Aggregate traffic and signups over the trailing analytics window.
#[instrument(skip_all)]
pub async fn analytics(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let window = AnalyticsWindow::trailing_days(Utc::now(), ANALYTICS_WINDOW_DAYS);
    tracing::debug!(user_id = %admin.id, since = %window.since, "Loading analytics");
    let store = state.store();

    let domain_views = store.domain_views_since(window.since).await?;
    let daily_views = store.daily_views_since(window.since).await?;
    let trial_signups = store.count_trial_requests_since(window.since).await?;

    Ok(Json(AnalyticsSummary {
        domain_views,
        daily_views,
        trial_signups,
    }))
}
