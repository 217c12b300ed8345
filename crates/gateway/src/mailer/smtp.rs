//! SMTP transport over lettre.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};

use super::{EmailMessage, Mailer, MailerError, SentEmail};

/// Connection settings for [`SmtpMailer`].
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub default_from: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("default_from", &self.default_from)
            .finish()
    }
}

/// Relays email through an SMTP server with STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    default_from: String,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("default_from", &self.default_from)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Build the transport. No connection is made until the first send.
    ///
    /// # Errors
    ///
    /// Returns error if the relay host is invalid.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailerError> {
        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose_secret().to_owned(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            default_from: settings.default_from.clone(),
        })
    }
}

fn mailbox(raw: &str) -> Result<Mailbox, MailerError> {
    raw.parse()
        .map_err(|_| MailerError::InvalidAddress(raw.to_owned()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(skip(self, message), fields(subject = %message.subject))]
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, MailerError> {
        if message.to.is_empty() {
            return Err(MailerError::NoRecipients);
        }
        let from = message
            .from_display_name
            .as_deref()
            .unwrap_or(&self.default_from);

        let mut builder = Message::builder()
            .from(mailbox(from)?)
            .subject(message.subject.as_str());
        for to in &message.to {
            builder = builder.to(mailbox(to)?);
        }
        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(mailbox(reply_to)?);
        }

        let html = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone());
        let email = match &message.text_body {
            Some(text) => builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.clone()),
                    )
                    .singlepart(html),
            )?,
            None => builder.singlepart(html)?,
        };

        let response = self.transport.send(email).await?;
        let id = response
            .first_line()
            .map_or_else(|| response.code().to_string(), ToOwned::to_owned);
        tracing::info!(%id, "Email relayed");
        Ok(SentEmail { id })
    }
}
