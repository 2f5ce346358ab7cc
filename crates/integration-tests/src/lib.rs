//! Integration test harness for the EdGPT web service.
//!
//! Drives the full router in process with `tower::ServiceExt::oneshot`,
//! backed by [`InMemoryStore`] and `tower_sessions::MemoryStore`, so no
//! database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p edgpt-integration-tests
//!
//! # Live smoke tests against a running server (EDGPT_TEST_URL)
//! cargo test -p edgpt-integration-tests -- --ignored
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{DateTime, NaiveDate, Utc};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use edgpt_core::{
    AnalyticsEvent, AnalyticsEventId, DailyDomainViews, DailyViews, DomainRegistry, DomainViews,
    Email, NewPageView, NewTrialRequest, NewUser, TrialRequest, TrialRequestId, TrialStatus, User,
    UserId,
};
use edgpt_web::{
    AppState, WebConfig,
    db::{AnalyticsRepository, Repositories, RepositoryError, TrialRequestRepository, UserRepository},
    middleware::SESSION_COOKIE_NAME,
    services::auth::{AuthService, NewAccount},
};

// =============================================================================
// In-memory store
// =============================================================================

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    trial_requests: Vec<TrialRequest>,
    analytics: Vec<AnalyticsEvent>,
    next_id: i32,
}

impl Tables {
    const fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Repository implementation over plain vectors.
///
/// Aggregates are ordered the same way as the `PostgreSQL` queries.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    /// When set, every call fails with a database error.
    unavailable: AtomicBool,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.tables.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Make every subsequent call fail, as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Snapshot of stored trial requests, oldest first.
    #[must_use]
    pub fn trial_requests(&self) -> Vec<TrialRequest> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .trial_requests
            .clone()
    }

    /// Snapshot of recorded page views, oldest first.
    #[must_use]
    pub fn page_views(&self) -> Vec<AnalyticsEvent> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .analytics
            .clone()
    }

    /// Append a page view with an explicit timestamp.
    pub fn insert_page_view_at(&self, domain: &str, page_path: &str, at: DateTime<Utc>) {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let id = tables.next_id();
        tables.analytics.push(AnalyticsEvent {
            id: AnalyticsEventId::new(id),
            domain: domain.to_owned(),
            page_path: page_path.to_owned(),
            user_agent: None,
            ip_address: None,
            created_at: at,
        });
    }
}

fn utc_day(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let created = User {
            id: UserId::new(tables.next_id()),
            email: user.email,
            password_hash: user.password_hash,
            website_url: user.website_url,
            business_name: user.business_name,
            phone: user.phone,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl TrialRequestRepository for InMemoryStore {
    async fn create_trial_request(
        &self,
        request: NewTrialRequest,
    ) -> Result<TrialRequest, RepositoryError> {
        let mut tables = self.tables()?;
        let created = TrialRequest {
            id: TrialRequestId::new(tables.next_id()),
            email: request.email,
            website_url: request.website_url,
            business_name: request.business_name,
            phone: request.phone,
            status: TrialStatus::Pending,
            created_at: Utc::now(),
        };
        tables.trial_requests.push(created.clone());
        Ok(created)
    }

    async fn recent_trial_requests(
        &self,
        limit: i64,
    ) -> Result<Vec<TrialRequest>, RepositoryError> {
        let mut rows = self.tables()?.trial_requests.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn count_trial_requests_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let count = self
            .tables()?
            .trial_requests
            .iter()
            .filter(|r| r.created_at >= since)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryStore {
    async fn record_page_view(&self, view: NewPageView) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        let id = tables.next_id();
        tables.analytics.push(AnalyticsEvent {
            id: AnalyticsEventId::new(id),
            domain: view.domain,
            page_path: view.page_path,
            user_agent: view.user_agent,
            ip_address: view.ip_address,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn domain_views_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DomainViews>, RepositoryError> {
        let tables = self.tables()?;
        let mut rows: Vec<DomainViews> = Vec::new();
        for event in tables.analytics.iter().filter(|e| e.created_at >= since) {
            match rows.iter_mut().find(|r| r.domain == event.domain) {
                Some(row) => row.views += 1,
                None => rows.push(DomainViews {
                    domain: event.domain.clone(),
                    views: 1,
                }),
            }
        }
        rows.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.domain.cmp(&b.domain)));
        Ok(rows)
    }

    async fn daily_views_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyViews>, RepositoryError> {
        let tables = self.tables()?;
        let mut rows: Vec<DailyViews> = Vec::new();
        for event in tables.analytics.iter().filter(|e| e.created_at >= since) {
            let date = utc_day(event.created_at);
            match rows.iter_mut().find(|r| r.date == date) {
                Some(row) => row.views += 1,
                None => rows.push(DailyViews { date, views: 1 }),
            }
        }
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn recent_daily_domain_views(
        &self,
        limit: i64,
    ) -> Result<Vec<DailyDomainViews>, RepositoryError> {
        let tables = self.tables()?;
        let mut rows: Vec<DailyDomainViews> = Vec::new();
        for event in &tables.analytics {
            let date = utc_day(event.created_at);
            match rows
                .iter_mut()
                .find(|r| r.date == date && r.domain == event.domain)
            {
                Some(row) => row.views += 1,
                None => rows.push(DailyDomainViews {
                    date,
                    domain: event.domain.clone(),
                    views: 1,
                }),
            }
        }
        rows.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.views.cmp(&a.views))
                .then_with(|| a.domain.cmp(&b.domain))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }
}

#[async_trait]
impl Repositories for InMemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.tables().map(|_| ())
    }
}

// =============================================================================
// Test application
// =============================================================================

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` pair of the session cookie set by this response.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_owned)
    }

    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body should be JSON")
    }
}

/// The full web application over in-memory storage.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    /// Build the application with the built-in registry.
    ///
    /// # Panics
    ///
    /// Panics if the test configuration is rejected.
    #[must_use]
    pub fn new() -> Self {
        let config = WebConfig::from_lookup(|key| match key {
            "EDGPT_DATABASE_URL" => Some("postgres://localhost/edgpt_test".to_owned()),
            _ => None,
        })
        .expect("test configuration should be valid");

        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(config, DomainRegistry::builtin(), store.clone());
        let router = edgpt_web::app(state, MemoryStore::default());

        Self { router, store }
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body is not UTF-8.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should not fail");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("body should be UTF-8"),
        }
    }

    /// GET `path` on `host`, optionally with a session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn get(&self, host: &str, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().uri(path).header(header::HOST, host);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    /// POST a urlencoded form body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn post_form(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::HOST, "edgpt.ai")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .expect("valid request");
        self.send(request).await
    }

    /// POST a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::HOST, "edgpt.ai")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// Create an account directly in the store.
    ///
    /// # Panics
    ///
    /// Panics if the account is rejected.
    pub async fn create_user(&self, email: &str, password: &str, is_admin: bool) -> User {
        AuthService::new(self.store.as_ref())
            .create_account(NewAccount {
                email,
                password,
                business_name: None,
                is_admin,
            })
            .await
            .expect("account should be created")
    }

    /// Log in and return the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the login does not set a session cookie.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = format!("username={}&password={}", encode(email), encode(password));
        let response = self.post_form("/login", &body).await;
        response
            .session_cookie()
            .unwrap_or_else(|| panic!("login failed with {}: {}", response.status, response.body))
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent-encode the characters test credentials use.
#[must_use]
pub fn encode(value: &str) -> String {
    value.replace('%', "%25").replace('@', "%40").replace('&', "%26").replace('+', "%2B")
}
