//! Resend HTTP API transport.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{EmailMessage, Mailer, MailerError, SentEmail};

/// Resend API base URL.
const BASE_URL: &str = "https://api.resend.com";

/// Sends email through `POST /emails` on the Resend API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    base_url: String,
    default_from: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl ResendMailer {
    /// Create a client authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(api_key: &SecretString, default_from: impl Into<String>) -> Result<Self, MailerError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| MailerError::Parse(format!("Invalid API key format: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_owned(),
            default_from: default_from.into(),
        })
    }

    /// Point the client at another API host (staging, local mock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    #[tracing::instrument(skip(self, message), fields(subject = %message.subject, recipients = message.to.len()))]
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, MailerError> {
        if message.to.is_empty() {
            return Err(MailerError::NoRecipients);
        }
        let body = SendRequest {
            from: message
                .from_display_name
                .as_deref()
                .unwrap_or(&self.default_from),
            to: &message.to,
            subject: &message.subject,
            html: &message.html_body,
            text: message.text_body.as_deref(),
            reply_to: message.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(raw);
            tracing::error!(status = status.as_u16(), error = %message, "Resend API error");
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| MailerError::Parse(e.to_string()))?;
        tracing::info!(id = %sent.id, "Email sent");
        Ok(SentEmail { id: sent.id })
    }
}
