//! Registered accounts.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{Email, UserId};

/// A stored account.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub website_url: Option<String>,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("business_name", &self.business_name)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

/// Fields for inserting an account.
#[derive(Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub website_url: Option<String>,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub is_admin: bool,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("business_name", &self.business_name)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_hash() {
        let user = NewUser {
            email: Email::parse("admin@edgpt.ai").unwrap(),
            password_hash: "$argon2id$v=19$secret".to_owned(),
            website_url: None,
            business_name: Some("EdGPT Admin".to_owned()),
            phone: None,
            is_admin: true,
        };
        let debug = format!("{user:?}");
        assert!(debug.contains("admin@edgpt.ai"));
        assert!(!debug.contains("argon2"));
    }
}
