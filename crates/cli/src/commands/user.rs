//! Account management command.
//!
//! # Environment Variables
//!
//! - `EDGPT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `EDGPT_USER_PASSWORD` - Password for the new account

use secrecy::{ExposeSecret, SecretString};

use edgpt_web::db::{self, PgStore};
use edgpt_web::services::auth::{AuthService, NewAccount};

use super::{CommandError, database_url};

const PASSWORD_VAR: &str = "EDGPT_USER_PASSWORD";

/// Create a new account.
///
/// # Errors
///
/// Returns `CommandError` if the password variable is unset, the email or
/// password is rejected, or the email is already registered.
pub async fn create(
    email: &str,
    business_name: Option<String>,
    is_admin: bool,
) -> Result<(), CommandError> {
    let database_url = database_url()?;
    let password: SecretString = std::env::var(PASSWORD_VAR)
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar(PASSWORD_VAR))?;

    tracing::info!("Connecting to database...");
    let store = PgStore::new(db::create_pool(&database_url).await?);

    let user = AuthService::new(&store)
        .create_account(NewAccount {
            email,
            password: password.expose_secret(),
            business_name,
            is_admin,
        })
        .await?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        is_admin = user.is_admin,
        "Account created"
    );
    Ok(())
}
