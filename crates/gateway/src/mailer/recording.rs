//! In-memory transport for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{EmailMessage, Mailer, MailerError, SentEmail};

/// Keeps every message it is asked to send. Can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    failure: Mutex<Option<String>>,
    counter: AtomicUsize,
}

impl RecordingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following send with `message`.
    pub async fn fail_with(&self, message: &str) {
        *self.failure.lock().await = Some(message.to_owned());
    }

    /// Messages accepted so far, oldest first.
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, MailerError> {
        if let Some(failure) = self.failure.lock().await.clone() {
            return Err(MailerError::Api {
                status: 500,
                message: failure,
            });
        }
        if message.to.is_empty() {
            return Err(MailerError::NoRecipients);
        }
        self.sent.lock().await.push(message.clone());
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(SentEmail {
            id: format!("recorded-{n}"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_fails_on_demand() {
        let mailer = RecordingMailer::new();
        let message = EmailMessage::html("anna@example.com", "Hi", "<p>Hi</p>");

        let sent = mailer.send(&message).await.unwrap();
        assert_eq!(sent.id, "recorded-1");
        assert_eq!(mailer.sent().await, vec![message.clone()]);

        mailer.fail_with("quota exceeded").await;
        let err = mailer.send(&message).await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(mailer.sent().await.len(), 1);
    }
}
