//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `EDGPT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `EDGPT_HOST` - Bind address (default: 0.0.0.0)
//! - `EDGPT_PORT` - Listen port (default: 8082)
//! - `EDGPT_BASE_URL` - Public URL (default: <http://localhost:8082>)
//! - `EDGPT_ADMIN_EMAIL` - Bootstrap admin account (default: admin@edgpt.ai)
//! - `EDGPT_ADMIN_PASSWORD` - Bootstrap admin password; no admin is created when unset
//! - `EDGPT_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use edgpt_core::Email;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_ADMIN_EMAIL: &str = "admin@edgpt.ai";
const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

/// Admin account ensured at startup.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: Email,
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Web service configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL, used to decide whether cookies are `Secure`
    pub base_url: String,
    pub admin: AdminBootstrap,
    pub log_format: LogFormat,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl WebConfig {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = env.database_url("EDGPT_DATABASE_URL")?;
        let host = env.parsed_or_default("EDGPT_HOST", "0.0.0.0")?;
        let port = env.parsed_or_default("EDGPT_PORT", "8082")?;

        let base_url = env.get_env_or_default("EDGPT_BASE_URL", "http://localhost:8082");
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("EDGPT_BASE_URL".to_owned(), e.to_string()))?;

        let admin = AdminBootstrap::from_env(&env)?;
        let log_format = env.parsed_or_default("EDGPT_LOG_FORMAT", "text")?;

        let sentry_dsn = env.get_optional_env("SENTRY_DSN");
        let sentry_environment = env.get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env.sample_rate("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = env.sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            admin,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over TLS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl AdminBootstrap {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_email = env.get_env_or_default("EDGPT_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL);
        let email = Email::parse(&raw_email).map_err(|e| {
            ConfigError::InvalidEnvVar("EDGPT_ADMIN_EMAIL".to_owned(), e.to_string())
        })?;

        let password = env
            .get_optional_env("EDGPT_ADMIN_PASSWORD")
            .map(SecretString::from);
        if let Some(password) = &password {
            validate_admin_password(password, "EDGPT_ADMIN_PASSWORD")?;
        }

        Ok(Self { email, password })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required environment variable.
    fn get_required_env(&self, key: &str) -> Result<String, ConfigError> {
        self.get_optional_env(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
    }

    /// Get an optional environment variable. Blank values count as unset.
    fn get_optional_env(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn get_env_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional_env(key)
            .unwrap_or_else(|| default.to_owned())
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.get_required_env(primary_key)
            .or_else(|_| self.get_required_env("DATABASE_URL"))
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_owned()))
    }

    fn parsed_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_env_or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
    }

    fn sample_rate(&self, key: &str, default: &str) -> Result<f32, ConfigError> {
        let rate: f32 = self.parsed_or_default(key, default)?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::InvalidEnvVar(
                key.to_owned(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ))
        }
    }
}

fn validate_admin_password(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let len = secret.expose_secret().chars().count();
    if len < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!("must be at least {MIN_ADMIN_PASSWORD_LENGTH} characters (got {len})"),
        ));
    }
    Ok(())
}
