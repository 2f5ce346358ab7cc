//! Customer and admin dashboards.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use edgpt_core::{BrandConfig, DailyDomainViews, TrialRequest};

use crate::error::Result;
use crate::filters;
use crate::middleware::{ClientInfo, CurrentBrand, RequireAdmin, RequireUser};
use crate::services::analytics::log_page_view;
use crate::state::AppState;

/// Rows of per-domain daily views shown on the admin dashboard.
const ADMIN_ANALYTICS_ROWS: i64 = 50;

/// Trial requests shown on the admin dashboard.
const ADMIN_TRIAL_REQUEST_ROWS: i64 = 20;

/// Customer dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub brand: BrandConfig,
    pub email: String,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub brand: BrandConfig,
    pub email: String,
    pub analytics: Vec<DailyDomainViews>,
    pub trial_requests: Vec<TrialRequest>,
    pub domains: Vec<String>,
}

/// Display the customer dashboard.
#[instrument(skip_all, fields(host = %brand.host))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    brand: CurrentBrand,
    client: ClientInfo,
) -> DashboardTemplate {
    log_page_view(&state, &brand, client, "/dashboard").await;

    DashboardTemplate {
        brand: brand.brand().clone(),
        email: user.email.into_inner(),
    }
}

/// Display the admin dashboard with recent traffic and signups.
#[instrument(skip_all, fields(host = %brand.host))]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    brand: CurrentBrand,
    client: ClientInfo,
) -> Result<AdminDashboardTemplate> {
    log_page_view(&state, &brand, client, "/admin/dashboard").await;

    let analytics = state
        .store()
        .recent_daily_domain_views(ADMIN_ANALYTICS_ROWS)
        .await?;
    let trial_requests = state
        .store()
        .recent_trial_requests(ADMIN_TRIAL_REQUEST_ROWS)
        .await?;

    Ok(AdminDashboardTemplate {
        brand: brand.brand().clone(),
        email: admin.email.into_inner(),
        analytics,
        trial_requests,
        domains: state.registry().keys().map(str::to_owned).collect(),
    })
}
