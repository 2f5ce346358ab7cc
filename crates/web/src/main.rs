//! EdGPT web service binary.
//!
//! Serves every registered brand domain on port 8082 by default.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edgpt_core::DomainRegistry;
use edgpt_web::{
    AppState, WebConfig,
    config::LogFormat,
    db::{self, PgStore},
    middleware::postgres_session_store,
    routes,
    services::auth::{AuthService, NewAccount},
};

/// Business name given to the bootstrapped admin account.
const ADMIN_BUSINESS_NAME: &str = "EdGPT Admin";

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &WebConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "edgpt_web=info,tower_http=info".into());

    let json_layer = (format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (format == LogFormat::Text).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Create the configured admin account if it does not exist yet.
async fn bootstrap_admin(config: &WebConfig, store: &PgStore) {
    use secrecy::ExposeSecret;

    let Some(password) = &config.admin.password else {
        tracing::debug!("No admin password configured, skipping admin bootstrap");
        return;
    };

    let account = NewAccount {
        email: config.admin.email.as_str(),
        password: password.expose_secret(),
        business_name: Some(ADMIN_BUSINESS_NAME.to_owned()),
        is_admin: true,
    };

    match AuthService::new(store).ensure_account(account).await {
        Ok((user, true)) => tracing::info!(user_id = %user.id, "Admin account created"),
        Ok((user, false)) => tracing::debug!(user_id = %user.id, "Admin account present"),
        Err(e) => tracing::error!(error = %e, "Admin bootstrap failed"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (needed for Sentry init)
    let config = WebConfig::from_env()?;

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p edgpt-cli -- migrate

    let store = PgStore::new(pool.clone());
    bootstrap_admin(&config, &store).await;

    let registry = DomainRegistry::builtin();
    for entry in registry.entries() {
        tracing::info!(
            domain = entry.key(),
            template = %entry.template(),
            brand = %entry.brand().name,
            "Registered domain"
        );
    }

    let addr = config.socket_addr();
    let session_store = postgres_session_store(&pool);
    let state = AppState::new(config, registry, Arc::new(store));

    let app = routes::app(state, session_store)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("edgpt-web listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
