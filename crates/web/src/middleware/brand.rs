//! Brand resolution extractor.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use edgpt_core::{BrandConfig, LandingTemplate, RegistryEntry, normalize_host};

use crate::state::AppState;

/// Brand resolved from the request's `Host`.
///
/// Falls back to the URI authority (HTTP/2) and then to the default brand.
#[derive(Debug, Clone)]
pub struct CurrentBrand {
    /// Normalized host as sent by the client.
    pub host: String,
    pub entry: RegistryEntry,
}

impl CurrentBrand {
    #[must_use]
    pub const fn brand(&self) -> &BrandConfig {
        self.entry.brand()
    }

    #[must_use]
    pub const fn template(&self) -> LandingTemplate {
        self.entry.template()
    }
}

/// Raw host of a request, without normalization.
pub fn request_host(parts: &Parts) -> &str {
    parts
        .headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| parts.uri.authority().map(axum::http::uri::Authority::as_str))
        .unwrap_or_default()
}

impl FromRequestParts<AppState> for CurrentBrand {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = request_host(parts);
        let entry = state.registry().resolve_entry(raw).clone();

        Ok(Self {
            host: normalize_host(raw),
            entry,
        })
    }
}
