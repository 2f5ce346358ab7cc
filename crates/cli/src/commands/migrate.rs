//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! edgpt-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `EDGPT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! `crates/web/migrations/`, plus the `tower_sessions` schema owned by the
//! session store.

use edgpt_web::db;
use edgpt_web::middleware::postgres_session_store;

use super::{CommandError, database_url};

/// Run the web service migrations and create the session table.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    postgres_session_store(&pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
