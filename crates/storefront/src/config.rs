//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `RESEND_API_KEY` - Resend API key for outbound email
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD` - SMTP relay,
//!   used when `RESEND_API_KEY` is not set
//! - `EMAIL_FROM` - Sender mailbox (default: `Portell Winery <onboarding@resend.dev>`)
//! - `CONTACT_INBOX` - Where contact form messages go (default: `contact@portell.wine`)
//! - `CHECKOUT_ATOMIC_BOOKINGS` - Reserve event seats with a single bounded
//!   update instead of read-then-write (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use portell_gateway::env;
use portell_gateway::mailer::{DEFAULT_FROM, SmtpSettings};
use secrecy::SecretString;

pub use portell_gateway::env::ConfigError;

/// Default inbox for contact form submissions.
pub const DEFAULT_CONTACT_INBOX: &str = "contact@portell.wine";

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Validated at start-up; the session store signs nothing with it yet
    pub session_secret: SecretString,
    pub email: EmailConfig,
    /// Reserve seats with one bounded update during event checkout
    pub atomic_bookings: bool,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Outbound email configuration.
///
/// Implements `Debug` manually to redact the Resend key.
#[derive(Clone)]
pub struct EmailConfig {
    /// Resend API key; takes precedence over SMTP
    pub resend_api_key: Option<SecretString>,
    pub smtp: Option<SmtpSettings>,
    /// Sender mailbox, `Name <address>`
    pub from: String,
    /// Recipient of contact form messages
    pub contact_inbox: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("smtp", &self.smtp)
            .field("from", &self.from)
            .field("contact_inbox", &self.contact_inbox)
            .finish()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            smtp: None,
            from: DEFAULT_FROM.to_owned(),
            contact_inbox: DEFAULT_CONTACT_INBOX.to_owned(),
        }
    }
}

impl StorefrontConfig {
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
            database_url: env::database_url("STOREFRONT_DATABASE_URL")?,
            host: env::parsed("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env::parsed("STOREFRONT_PORT", 3000)?,
            base_url: env::required("STOREFRONT_BASE_URL")?,
            session_secret: env::session_secret("STOREFRONT_SESSION_SECRET")?,
            email: EmailConfig::from_env()?,
            atomic_bookings: env::flag("CHECKOUT_ATOMIC_BOOKINGS")?,
            sentry_dsn: env::optional("SENTRY_DSN"),
            sentry_environment: env::optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env::sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env::sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Loopback settings for tests and local tooling. No mail transport and
    /// no Sentry.
    #[must_use]
    pub fn local() -> Self {
        Self {
            database_url: SecretString::from("postgres://localhost/portell"),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            session_secret: SecretString::from("local-only-session-secret-not-for-production"),
            email: EmailConfig::default(),
            atomic_bookings: false,
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

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let from = env::or_default("EMAIL_FROM", DEFAULT_FROM);
        let smtp = match env::optional("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host,
                port: env::parsed("SMTP_PORT", 587)?,
                username: env::required("SMTP_USERNAME")?,
                password: env::secret("SMTP_PASSWORD")?,
                default_from: from.clone(),
            }),
            None => None,
        };

        Ok(Self {
            resend_api_key: env::optional("RESEND_API_KEY").map(SecretString::from),
            smtp,
            from,
            contact_inbox: env::or_default("CONTACT_INBOX", DEFAULT_CONTACT_INBOX),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config_reproduces_race() {
        let config = StorefrontConfig::local();
        assert!(!config.atomic_bookings);
        assert_eq!(config.email.contact_inbox, DEFAULT_CONTACT_INBOX);
        assert_eq!(config.socket_addr().port(), 3000);
    }

    #[test]
    fn test_email_config_debug_redacts_key() {
        let config = EmailConfig {
            resend_api_key: Some(SecretString::from("re_live_abcdef")),
            ..EmailConfig::default()
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("re_live_abcdef"));
        assert!(debug_output.contains("onboarding@resend.dev"));
    }
}
