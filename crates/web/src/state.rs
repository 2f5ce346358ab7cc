//! Application state shared across handlers.

use std::sync::Arc;

use edgpt_core::DomainRegistry;

use crate::config::WebConfig;
use crate::db::Repositories;

/// Application state shared across all handlers.
///
/// Cheaply cloneable; the registry is immutable after startup so handlers
/// read it without locking.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    registry: DomainRegistry,
    store: Arc<dyn Repositories>,
}

impl AppState {
    #[must_use]
    pub fn new(config: WebConfig, registry: DomainRegistry, store: Arc<dyn Repositories>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                store,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn registry(&self) -> &DomainRegistry {
        &self.inner.registry
    }

    /// Users, trial requests and analytics.
    #[must_use]
    pub fn store(&self) -> &dyn Repositories {
        self.inner.store.as_ref()
    }
}
