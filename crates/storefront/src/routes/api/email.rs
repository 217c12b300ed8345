//! Raw email delivery endpoint.
//!
//! `POST /api/send-email` takes `{to, subject, html, from?}` and hands it to
//! the configured mailer. `to` may be one address or a list.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use portell_gateway::mailer::EmailMessage;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::state::AppState;

/// CORS headers for every response, plus a resource policy that lets
/// other origins read the JSON.
fn cors_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ),
        (
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("cross-origin"),
        ),
    ]
}

/// One address or several.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    fn into_vec(self) -> Vec<String> {
        let list = match self {
            Self::One(address) => vec![address],
            Self::Many(list) => list,
        };
        list.into_iter()
            .map(|address| address.trim().to_owned())
            .filter(|address| !address.is_empty())
            .collect()
    }
}

/// Request body for `/api/send-email`.
#[derive(Debug, Default, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<Recipients>,
    pub subject: Option<String>,
    pub html: Option<String>,
    pub from: Option<String>,
}

impl SendEmailRequest {
    /// Build the message, or `None` when a required field is missing or blank.
    fn into_message(self) -> Option<EmailMessage> {
        let to = self.to.map(Recipients::into_vec).filter(|to| !to.is_empty())?;
        let subject = self.subject.filter(|s| !s.trim().is_empty())?;
        let html = self.html.filter(|h| !h.trim().is_empty())?;

        Some(EmailMessage {
            from_display_name: self.from.filter(|f| !f.trim().is_empty()),
            to,
            subject,
            html_body: html,
            text_body: None,
            reply_to: None,
        })
    }
}

/// Send an email on behalf of the caller.
#[instrument(skip(state, body), fields(method = %method))]
pub async fn send_email(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, cors_headers()).into_response();
    }
    if method != Method::POST {
        return reply(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "error": "Method not allowed" }),
        );
    }

    if !state.mailer().is_configured() {
        tracing::error!("Email endpoint called without a configured provider");
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Email service not configured" }),
        );
    }

    let request: SendEmailRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable email request body");
            SendEmailRequest::default()
        }
    };
    let Some(message) = request.into_message() else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Missing required fields: to, subject, html" }),
        );
    };

    match state.mailer().send(&message).await {
        Ok(sent) => {
            tracing::info!(email_id = %sent.id, recipients = message.to.len(), "Email sent");
            reply(
                StatusCode::OK,
                json!({
                    "success": true,
                    "id": sent.id,
                    "message": "Email sent successfully",
                }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Email provider rejected message");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Failed to send email",
                    "details": e.to_string(),
                }),
            )
        }
    }
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, cors_headers(), Json(body)).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(body: &str) -> SendEmailRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_single_recipient_string() {
        let message = request(r#"{"to":"anna@example.com","subject":"Hi","html":"<p>Hi</p>"}"#)
            .into_message()
            .unwrap();
        assert_eq!(message.to, vec!["anna@example.com".to_owned()]);
        assert_eq!(message.from_display_name, None);
    }

    #[test]
    fn test_recipient_list_and_sender() {
        let message = request(
            r#"{"to":["anna@example.com"," jan@example.com "],"subject":"Hi","html":"<p>Hi</p>","from":"Portell <news@portell.wine>"}"#,
        )
        .into_message()
        .unwrap();
        assert_eq!(
            message.to,
            vec!["anna@example.com".to_owned(), "jan@example.com".to_owned()]
        );
        assert_eq!(
            message.from_display_name.as_deref(),
            Some("Portell <news@portell.wine>")
        );
    }

    #[test]
    fn test_missing_fields() {
        assert!(request(r#"{"subject":"Hi","html":"<p>Hi</p>"}"#).into_message().is_none());
        assert!(request(r#"{"to":[],"subject":"Hi","html":"<p>Hi</p>"}"#).into_message().is_none());
        assert!(request(r#"{"to":"a@b.pl","subject":" ","html":"<p>Hi</p>"}"#).into_message().is_none());
        assert!(request(r#"{"to":"a@b.pl","subject":"Hi"}"#).into_message().is_none());
    }
}
