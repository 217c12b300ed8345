//! Application state shared across handlers.

use std::sync::Arc;

use portell_gateway::Gateway;
use portell_gateway::mailer::{DisabledMailer, Mailer, MailerError, ResendMailer, SmtpMailer};

use crate::config::{EmailConfig, StorefrontConfig};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the data gateway, the mailer and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    gateway: Gateway,
    mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, gateway: Gateway, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                mailer,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the data gateway.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.inner.gateway
    }

    /// Get a reference to the outbound mailer.
    #[must_use]
    pub fn mailer(&self) -> &dyn Mailer {
        self.inner.mailer.as_ref()
    }
}

/// Pick the mail transport from configuration.
///
/// Resend wins over SMTP. With neither configured, mail is disabled and
/// every send fails with [`MailerError::NotConfigured`].
///
/// # Errors
///
/// Returns error if the configured transport cannot be constructed.
pub fn build_mailer(config: &EmailConfig) -> Result<Arc<dyn Mailer>, MailerError> {
    if let Some(api_key) = &config.resend_api_key {
        tracing::info!("Email delivery via Resend");
        return Ok(Arc::new(ResendMailer::new(api_key, config.from.clone())?));
    }
    if let Some(smtp) = &config.smtp {
        tracing::info!(host = %smtp.host, "Email delivery via SMTP");
        return Ok(Arc::new(SmtpMailer::new(smtp)?));
    }
    tracing::warn!("No email transport configured, outbound email disabled");
    Ok(Arc::new(DisabledMailer))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mailer_without_transport_is_disabled() {
        let mailer = build_mailer(&EmailConfig::default()).unwrap();
        assert!(!mailer.is_configured());
    }

    #[test]
    fn test_build_mailer_prefers_resend() {
        let config = EmailConfig {
            resend_api_key: Some("re_test_key".to_owned().into()),
            ..EmailConfig::default()
        };
        let mailer = build_mailer(&config).unwrap();
        assert!(mailer.is_configured());
    }
}
