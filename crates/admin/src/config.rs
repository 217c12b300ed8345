//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `ADMIN_USERNAME` - Login name of the back-office account
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC string, see `portell-cli admin hash-password`
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `STORAGE_URL` - Storage API project URL; enables image uploads
//! - `STORAGE_BUCKET` - Bucket for uploaded images (default: `images`)
//! - `STORAGE_SERVICE_KEY` - Service key for the storage API (required with `STORAGE_URL`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use portell_gateway::env;
use secrecy::SecretString;

pub use portell_gateway::env::ConfigError;

const DEFAULT_STORAGE_BUCKET: &str = "images";

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Validated at start-up; the session store signs nothing with it yet
    pub session_secret: SecretString,
    /// The back-office login
    pub credentials: CredentialConfig,
    /// Image storage; uploads are refused without it
    pub storage: Option<StorageConfig>,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Username and password hash of the back-office account.
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: SecretString,
}

/// Storage API settings for image uploads.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub url: String,
    pub bucket: String,
    pub service_key: SecretString,
}

impl AdminConfig {
    /// Load configuration from environment variables, reading `.env` first
    /// when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, a value does
    /// not parse, or the session secret looks weak.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: env::database_url("ADMIN_DATABASE_URL")?,
            host: env::parsed("ADMIN_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env::parsed("ADMIN_PORT", 3001)?,
            base_url: env::required("ADMIN_BASE_URL")?,
            session_secret: env::session_secret("ADMIN_SESSION_SECRET")?,
            credentials: CredentialConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            sentry_dsn: env::optional("SENTRY_DSN"),
            sentry_environment: env::optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env::sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env::sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Loopback settings for tests and local tooling, logging in as
    /// `username` with an already hashed password.
    #[must_use]
    pub fn local(username: &str, password_hash: &str) -> Self {
        Self {
            database_url: SecretString::from("postgres://localhost/portell"),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://localhost:3001".to_owned(),
            session_secret: SecretString::from("local-only-session-secret-not-for-production"),
            credentials: CredentialConfig {
                username: username.to_owned(),
                password_hash: SecretString::from(password_hash),
            },
            storage: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CredentialConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let password_hash = env::required("ADMIN_PASSWORD_HASH")?;
        check_password_hash(&password_hash)?;
        Ok(Self {
            username: env::required("ADMIN_USERNAME")?.trim().to_owned(),
            password_hash: SecretString::from(password_hash),
        })
    }
}

/// Refuse anything that is not a PHC string. Catches the plain password
/// pasted into the variable.
fn check_password_hash(value: &str) -> Result<(), ConfigError> {
    if value.starts_with("$argon2") {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "ADMIN_PASSWORD_HASH".to_owned(),
            "expected an argon2 hash (run `portell-cli admin hash-password`)".to_owned(),
        ))
    }
}

impl StorageConfig {
    /// `None` when `STORAGE_URL` is unset.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(url) = env::optional("STORAGE_URL") else {
            return Ok(None);
        };
        Ok(Some(Self {
            url,
            bucket: env::or_default("STORAGE_BUCKET", DEFAULT_STORAGE_BUCKET),
            service_key: env::secret("STORAGE_SERVICE_KEY")?,
        }))
    }
}
