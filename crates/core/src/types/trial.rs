//! Trial signup requests.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::{Email, EmailError, TrialRequestId, TrialStatus};

/// Why a signup submission was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignupError {
    #[error("Email and website URL are required")]
    MissingRequired,
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
}

/// A stored trial request. Rows are never updated by the web service.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRequest {
    pub id: TrialRequestId,
    pub email: Email,
    pub website_url: String,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub status: TrialStatus,
    pub created_at: DateTime<Utc>,
}

/// A validated signup ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrialRequest {
    pub email: Email,
    pub website_url: String,
    pub business_name: Option<String>,
    pub phone: Option<String>,
}

impl NewTrialRequest {
    /// Validate raw form values.
    ///
    /// All values are trimmed. Email and website URL are required; blank
    /// optional fields become `None`.
    ///
    /// # Errors
    ///
    /// [`SignupError::MissingRequired`] when the email or website URL is
    /// absent or blank, [`SignupError::InvalidEmail`] when the email is
    /// malformed.
    pub fn parse(
        email: Option<&str>,
        website_url: Option<&str>,
        business_name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, SignupError> {
        let (Some(email), Some(website_url)) = (non_blank(email), non_blank(website_url)) else {
            return Err(SignupError::MissingRequired);
        };

        Ok(Self {
            email: Email::parse(email)?,
            website_url: website_url.to_owned(),
            business_name: non_blank(business_name).map(str::to_owned),
            phone: non_blank(phone).map(str::to_owned),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let req = NewTrialRequest::parse(Some("a@b.com"), Some("http://x.com"), None, None).unwrap();
        assert_eq!(req.email.as_str(), "a@b.com");
        assert_eq!(req.website_url, "http://x.com");
        assert_eq!(req.business_name, None);
        assert_eq!(req.phone, None);
    }

    #[test]
    fn test_parse_trims_and_blanks_to_none() {
        let req = NewTrialRequest::parse(
            Some(" Owner@Firm.com "),
            Some(" https://firm.com "),
            Some("  "),
            Some(" 555-0100 "),
        )
        .unwrap();
        assert_eq!(req.email.as_str(), "owner@firm.com");
        assert_eq!(req.website_url, "https://firm.com");
        assert_eq!(req.business_name, None);
        assert_eq!(req.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_missing_required() {
        for (email, url) in [
            (None, Some("http://x.com")),
            (Some(""), Some("http://x.com")),
            (Some("a@b.com"), None),
            (Some("a@b.com"), Some("   ")),
        ] {
            assert_eq!(
                NewTrialRequest::parse(email, url, None, None),
                Err(SignupError::MissingRequired)
            );
        }
    }

    #[test]
    fn test_invalid_email() {
        assert!(matches!(
            NewTrialRequest::parse(Some("not-an-email"), Some("http://x.com"), None, None),
            Err(SignupError::InvalidEmail(EmailError::MissingAtSymbol))
        ));
    }
}
