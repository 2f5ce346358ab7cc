//! Page-view analytics.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::AnalyticsEventId;

/// Trailing window used by the analytics API.
pub const ANALYTICS_WINDOW_DAYS: u32 = 30;

/// A page view about to be appended to the analytics log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPageView {
    /// Normalized request host.
    pub domain: String,
    pub page_path: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// A stored page view.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub id: AnalyticsEventId,
    pub domain: String,
    pub page_path: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// View count for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainViews {
    pub domain: String,
    pub views: i64,
}

/// View count for one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyViews {
    pub date: NaiveDate,
    pub views: i64,
}

/// View count for one domain on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyDomainViews {
    pub date: NaiveDate,
    pub domain: String,
    pub views: i64,
}

/// Response body of the analytics API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    /// Sorted by views, highest first.
    pub domain_views: Vec<DomainViews>,
    /// Sorted by date, newest first.
    pub daily_views: Vec<DailyViews>,
    pub trial_signups: i64,
}

/// Half-open time window `[since, now)` for analytics queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub since: DateTime<Utc>,
}

impl AnalyticsWindow {
    /// Window starting at UTC midnight `days` days before `now`.
    #[must_use]
    pub fn trailing_days(now: DateTime<Utc>, days: u32) -> Self {
        let start = now
            .date_naive()
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            since: start.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.since
    }
}
