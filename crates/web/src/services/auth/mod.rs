//! Password authentication.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use edgpt_core::{Email, NewUser, User};

use crate::db::{RepositoryError, UserRepository};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Account details for [`AuthService::create_account`].
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub business_name: Option<String>,
    pub is_admin: bool,
}

/// Authentication service over any user store.
pub struct AuthService<'a, R: ?Sized> {
    users: &'a R,
}

impl<'a, R> AuthService<'a, R>
where
    R: UserRepository + ?Sized,
{
    #[must_use]
    pub const fn new(users: &'a R) -> Self {
        Self { users }
    }

    /// Check a username (email) and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if no account matches or the
    /// password is wrong.
    /// Returns `AuthError::PasswordHash` if the stored hash is unreadable.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Ok(email) = Email::parse(username) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn create_account(&self, account: NewAccount<'_>) -> Result<User, AuthError> {
        let new_user = prepare_user(account)?;

        self.users
            .create_user(new_user)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Create the account unless its email is already registered.
    ///
    /// An existing account is returned untouched; its password is not reset.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Self::create_account`].
    pub async fn ensure_account(&self, account: NewAccount<'_>) -> Result<(User, bool), AuthError> {
        let new_user = prepare_user(account)?;
        Ok(self.users.ensure_user(new_user).await?)
    }
}

fn prepare_user(account: NewAccount<'_>) -> Result<NewUser, AuthError> {
    let email = Email::parse(account.email)?;
    validate_password(account.password)?;

    Ok(NewUser {
        email,
        password_hash: hash_password(account.password)?,
        website_url: None,
        business_name: account.business_name,
        phone: None,
        is_admin: account.is_admin,
    })
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if the hash cannot be parsed and
/// `AuthError::InvalidCredentials` if the password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(
            hash_password("same password").unwrap(),
            hash_password("same password").unwrap()
        );
    }

    #[test]
    fn test_unparseable_hash() {
        // Legacy unsalted SHA-256 hex digests are not accepted.
        let legacy = "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";
        assert!(matches!(
            verify_password("admin123", legacy),
            Err(AuthError::PasswordHash)
        ));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("12345678").is_ok());
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }
}
