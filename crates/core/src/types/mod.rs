//! Entity and value types shared by the web service and the CLI.

pub mod analytics;
pub mod email;
pub mod id;
pub mod status;
pub mod trial;
pub mod user;

pub use analytics::{
    ANALYTICS_WINDOW_DAYS, AnalyticsEvent, AnalyticsSummary, AnalyticsWindow, DailyDomainViews,
    DailyViews, DomainViews, NewPageView,
};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::TrialStatus;
pub use trial::{NewTrialRequest, SignupError, TrialRequest};
pub use user::{NewUser, User};
