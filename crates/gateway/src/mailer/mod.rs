//! Outbound email.
//!
//! Callers build an [`EmailMessage`] and hand it to whichever [`Mailer`] the
//! binary was configured with:
//!
//! - [`ResendMailer`] posts to the Resend HTTP API
//! - [`SmtpMailer`] relays through an SMTP server with STARTTLS
//! - [`DisabledMailer`] rejects every message (no transport configured)
//! - [`RecordingMailer`] keeps messages in memory for tests

mod recording;
mod resend;
mod smtp;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use recording::RecordingMailer;
pub use resend::ResendMailer;
pub use smtp::{SmtpMailer, SmtpSettings};

/// Sender used when neither the message nor the configuration names one.
pub const DEFAULT_FROM: &str = "Portell Winery <onboarding@resend.dev>";

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailerError {
    /// No transport is configured.
    #[error("Email service not configured")]
    NotConfigured,

    /// Message has no recipients.
    #[error("No recipients")]
    NoRecipients,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected the message.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to parse the provider's response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failed to build the MIME message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid sender or recipient mailbox.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// One outbound email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    /// Sender mailbox, `"Name <address>"` or a bare address. `None` uses the
    /// transport's configured sender.
    pub from_display_name: Option<String>,
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
    /// Plain-text alternative, if any.
    pub text_body: Option<String>,
    pub reply_to: Option<String>,
}

impl EmailMessage {
    /// An HTML email to a single recipient from the default sender.
    #[must_use]
    pub fn html(to: impl Into<String>, subject: impl Into<String>, html_body: impl Into<String>) -> Self {
        Self {
            from_display_name: None,
            to: vec![to.into()],
            subject: subject.into(),
            html_body: html_body.into(),
            text_body: None,
            reply_to: None,
        }
    }

    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_body = Some(text.into());
        self
    }
}

/// Provider receipt for a sent email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentEmail {
    pub id: String,
}

/// An email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `message`.
    ///
    /// # Errors
    ///
    /// Returns the transport's error. Callers decide whether a failed
    /// delivery is fatal.
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, MailerError>;

    /// Whether this transport can send at all.
    fn is_configured(&self) -> bool {
        true
    }
}

/// A [`Mailer`] for deployments without an email provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, MailerError> {
        tracing::warn!(subject = %message.subject, "Email dropped, no transport configured");
        Err(MailerError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_mailer_refuses() {
        let message = EmailMessage::html("anna@example.com", "Hi", "<p>Hi</p>");
        let err = DisabledMailer.send(&message).await.unwrap_err();
        assert!(matches!(err, MailerError::NotConfigured));
        assert!(!DisabledMailer.is_configured());
    }

    #[test]
    fn test_builder_helpers() {
        let message = EmailMessage::html("anna@example.com", "Hi", "<p>Hi</p>")
            .with_reply_to("kontakt@portell.wine")
            .with_text("Hi");
        assert_eq!(message.to, vec!["anna@example.com".to_owned()]);
        assert_eq!(message.reply_to.as_deref(), Some("kontakt@portell.wine"));
        assert_eq!(message.text_body.as_deref(), Some("Hi"));
        assert!(message.from_display_name.is_none());
    }
}
