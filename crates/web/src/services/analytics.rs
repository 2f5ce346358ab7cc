//! Page-view logging.

use edgpt_core::NewPageView;

use crate::middleware::{ClientInfo, CurrentBrand};
use crate::state::AppState;

/// Append a page view for the current request.
///
/// Storage failures are logged and swallowed; a page is never failed
/// because its view could not be counted.
pub async fn log_page_view(state: &AppState, brand: &CurrentBrand, client: ClientInfo, path: &str) {
    let view = NewPageView {
        domain: brand.host.clone(),
        page_path: path.to_owned(),
        user_agent: client.user_agent,
        ip_address: client.ip_address,
    };

    if let Err(e) = state.store().record_page_view(view).await {
        tracing::warn!(error = %e, domain = %brand.host, path, "Analytics logging failed");
    }
}
