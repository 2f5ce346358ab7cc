//! `PostgreSQL` implementation of the repository traits.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use edgpt_core::{
    DailyDomainViews, DailyViews, DomainViews, Email, NewPageView,
    NewTrialRequest, NewUser, TrialRequest, TrialRequestId, TrialStatus, User, UserId,
};

use super::{
    AnalyticsRepository, Repositories, RepositoryError, TrialRequestRepository, UserRepository,
};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    password_hash: String,
    website_url: Option<String>,
    business_name: Option<String>,
    phone: Option<String>,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id),
            email: parse_email(&row.email)?,
            password_hash: row.password_hash,
            website_url: row.website_url,
            business_name: row.business_name,
            phone: row.phone,
            is_admin: row.is_admin,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrialRequestRow {
    id: i32,
    email: String,
    website_url: String,
    business_name: Option<String>,
    phone: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TrialRequestRow> for TrialRequest {
    type Error = RepositoryError;

    fn try_from(row: TrialRequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<TrialStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: TrialRequestId::new(row.id),
            email: parse_email(&row.email)?,
            website_url: row.website_url,
            business_name: row.business_name,
            phone: row.phone,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DomainViewsRow {
    domain: String,
    views: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct DailyViewsRow {
    date: NaiveDate,
    views: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct DailyDomainViewsRow {
    date: NaiveDate,
    domain: String,
    views: i64,
}

fn parse_email(raw: &str) -> Result<Email, RepositoryError> {
    Email::parse(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))
}

fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Store
// =============================================================================

/// Repository implementation over a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, password_hash, website_url, business_name, phone,
                   is_admin, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (email, password_hash, website_url, business_name, phone, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, website_url, business_name, phone,
                      is_admin, created_at
            ",
        )
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.website_url)
        .bind(&user.business_name)
        .bind(&user.phone)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email"))?;

        row.try_into()
    }
}

#[async_trait]
impl TrialRequestRepository for PgStore {
    async fn create_trial_request(
        &self,
        request: NewTrialRequest,
    ) -> Result<TrialRequest, RepositoryError> {
        let row = sqlx::query_as::<_, TrialRequestRow>(
            r"
            INSERT INTO trial_requests (email, website_url, business_name, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, website_url, business_name, phone, status, created_at
            ",
        )
        .bind(request.email.as_str())
        .bind(&request.website_url)
        .bind(&request.business_name)
        .bind(&request.phone)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn recent_trial_requests(
        &self,
        limit: i64,
    ) -> Result<Vec<TrialRequest>, RepositoryError> {
        let rows = sqlx::query_as::<_, TrialRequestRow>(
            r"
            SELECT id, email, website_url, business_name, phone, status, created_at
            FROM trial_requests
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count_trial_requests_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM trial_requests WHERE created_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

#[async_trait]
impl AnalyticsRepository for PgStore {
    async fn record_page_view(&self, view: NewPageView) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO analytics (domain, page_path, user_agent, ip_address)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(&view.domain)
        .bind(&view.page_path)
        .bind(&view.user_agent)
        .bind(&view.ip_address)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn domain_views_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DomainViews>, RepositoryError> {
        let rows = sqlx::query_as::<_, DomainViewsRow>(
            r"
            SELECT domain, COUNT(*) AS views
            FROM analytics
            WHERE created_at >= $1
            GROUP BY domain
            ORDER BY views DESC, domain
            ",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DomainViews {
                domain: r.domain,
                views: r.views,
            })
            .collect())
    }

    async fn daily_views_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyViews>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyViewsRow>(
            r"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS date, COUNT(*) AS views
            FROM analytics
            WHERE created_at >= $1
            GROUP BY 1
            ORDER BY 1 DESC
            ",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DailyViews {
                date: r.date,
                views: r.views,
            })
            .collect())
    }

    async fn recent_daily_domain_views(
        &self,
        limit: i64,
    ) -> Result<Vec<DailyDomainViews>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyDomainViewsRow>(
            r"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS date, domain, COUNT(*) AS views
            FROM analytics
            GROUP BY 1, domain
            ORDER BY date DESC, views DESC, domain
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DailyDomainViews {
                date: r.date,
                domain: r.domain,
                views: r.views,
            })
            .collect())
    }
}

#[async_trait]
impl Repositories for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
