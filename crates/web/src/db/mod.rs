//! Persistence for users, trial requests and page-view analytics.
//!
//! # Tables
//!
//! - `users` - Accounts (admins and customers)
//! - `trial_requests` - Signup form submissions, append-only
//! - `analytics` - Page views, append-only
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! Handlers only see the repository traits, so the service runs against
//! [`PgStore`] in production and an in-memory store in tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p edgpt-cli -- migrate
//! ```

pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use edgpt_core::{
    DailyDomainViews, DailyViews, DomainViews, Email, NewPageView, NewTrialRequest, NewUser,
    TrialRequest, User,
};

pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Account storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Insert a new account.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Insert the account unless one with the same email exists.
    ///
    /// Returns the stored account and whether it was created by this call.
    async fn ensure_user(&self, user: NewUser) -> Result<(User, bool), RepositoryError> {
        if let Some(existing) = self.find_by_email(&user.email).await? {
            return Ok((existing, false));
        }
        match self.create_user(user.clone()).await {
            Ok(created) => Ok((created, true)),
            // Lost a race with a concurrent insert.
            Err(RepositoryError::Conflict(_)) => self
                .find_by_email(&user.email)
                .await?
                .map(|existing| (existing, false))
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(e),
        }
    }
}

/// Trial request storage. Rows are never updated.
#[async_trait]
pub trait TrialRequestRepository: Send + Sync {
    async fn create_trial_request(
        &self,
        request: NewTrialRequest,
    ) -> Result<TrialRequest, RepositoryError>;

    /// Newest first.
    async fn recent_trial_requests(&self, limit: i64)
    -> Result<Vec<TrialRequest>, RepositoryError>;

    async fn count_trial_requests_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<i64, RepositoryError>;
}

/// Page-view analytics storage. Rows are never updated.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn record_page_view(&self, view: NewPageView) -> Result<(), RepositoryError>;

    /// Views per domain since `since`, most viewed first.
    async fn domain_views_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DomainViews>, RepositoryError>;

    /// Views per UTC day since `since`, newest day first.
    async fn daily_views_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyViews>, RepositoryError>;

    /// Views per (day, domain), newest day first, then most viewed.
    async fn recent_daily_domain_views(
        &self,
        limit: i64,
    ) -> Result<Vec<DailyDomainViews>, RepositoryError>;
}

/// Every store the web service needs.
#[async_trait]
pub trait Repositories: UserRepository + TrialRequestRepository + AnalyticsRepository {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
