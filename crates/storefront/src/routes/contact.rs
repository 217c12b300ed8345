//! Contact form and newsletter route handlers.
//!
//! Both send mail straight through the configured [`Mailer`]: the contact
//! form writes to the winery inbox and acknowledges the sender, the
//! newsletter form sends a welcome note.
//!
//! [`Mailer`]: portell_gateway::mailer::Mailer

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use chrono::{Datelike, Utc};
use portell_core::{Email, Language, ValidationError};
use portell_gateway::mailer::EmailMessage;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::i18n::Labels;
use crate::middleware::ClientState;
use crate::services::email_templates::render_note;
use crate::state::AppState;
use crate::views::Chrome;

/// Contact form data.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact/show.html")]
pub struct ContactTemplate {
    pub chrome: Chrome,
    pub form: ContactForm,
    pub error: Option<&'static str>,
    pub sent: bool,
}

/// Newsletter result fragment (replaces the footer form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/newsletter_result.html")]
pub struct NewsletterResultTemplate {
    pub message: &'static str,
    pub failed: bool,
}

/// Display the contact page.
#[instrument(skip(client))]
pub async fn show(client: ClientState) -> ContactTemplate {
    ContactTemplate {
        chrome: Chrome::load(&client).await,
        form: ContactForm::default(),
        error: None,
        sent: false,
    }
}

/// Send a contact message.
///
/// The inbox copy must go out for the message to count as sent. The
/// acknowledgement to the sender is best effort.
///
/// # Errors
///
/// Returns error if an email template fails to render.
#[instrument(skip(state, client, form))]
pub async fn submit(
    State(state): State<AppState>,
    client: ClientState,
    Form(form): Form<ContactForm>,
) -> Result<ContactTemplate> {
    let lang = client.language();
    let t = Labels::for_lang(lang);

    if let Err(message) = validate(&form, lang) {
        return Ok(ContactTemplate {
            chrome: Chrome::load(&client).await,
            form,
            error: Some(message),
            sent: false,
        });
    }

    let year = Utc::now().year();
    let name = form.name.trim();
    let email = form.email.trim();

    let body = inbox_body(&form);
    let subject = inbox_subject(&form);
    let html = render_note(&subject, None, &body, Language::Pl, year)?;
    let inbox = EmailMessage::html(&state.config().email.contact_inbox, subject, html)
        .with_reply_to(email)
        .with_text(body);

    if let Err(e) = state.mailer().send(&inbox).await {
        tracing::error!(error = %e, "Failed to deliver contact message");
        return Ok(ContactTemplate {
            chrome: Chrome::load(&client).await,
            form,
            error: Some(t.message_failed),
            sent: false,
        });
    }
    tracing::info!("Contact message delivered");

    let greeting = format!("{} {name}", t.contact_ack_greeting);
    let html = render_note(
        t.contact_ack_subject,
        Some(&greeting),
        t.contact_ack_body,
        lang,
        year,
    )?;
    let ack = EmailMessage::html(email, t.contact_ack_subject, html)
        .with_text(format!("{greeting},\n\n{}", t.contact_ack_body));
    if let Err(e) = state.mailer().send(&ack).await {
        tracing::warn!(error = %e, "Failed to send contact acknowledgement");
    }

    Ok(ContactTemplate {
        chrome: Chrome::load(&client).await,
        form: ContactForm::default(),
        error: None,
        sent: true,
    })
}

/// Subscribe to the newsletter (HTMX fragment).
///
/// # Errors
///
/// Returns error if the welcome template fails to render.
#[instrument(skip(state, client, form))]
pub async fn newsletter(
    State(state): State<AppState>,
    client: ClientState,
    Form(form): Form<SubscribeForm>,
) -> Result<NewsletterResultTemplate> {
    let lang = client.language();
    let t = Labels::for_lang(lang);

    let Ok(email) = Email::parse(form.email.trim()) else {
        return Ok(NewsletterResultTemplate {
            message: ValidationError::InvalidEmail.message(lang),
            failed: true,
        });
    };

    let html = render_note(
        t.welcome_subject,
        None,
        t.welcome_body,
        lang,
        Utc::now().year(),
    )?;
    let welcome = EmailMessage::html(email.as_str(), t.welcome_subject, html)
        .with_text(t.welcome_body);

    match state.mailer().send(&welcome).await {
        Ok(sent) => {
            tracing::info!(email_id = %sent.id, "Newsletter welcome sent");
            Ok(NewsletterResultTemplate {
                message: t.subscribed,
                failed: false,
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to send newsletter welcome");
            Ok(NewsletterResultTemplate {
                message: t.subscribe_failed,
                failed: true,
            })
        }
    }
}

fn validate(form: &ContactForm, lang: Language) -> std::result::Result<(), &'static str> {
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Err(Labels::for_lang(lang).contact_required);
    }
    Email::parse(form.email.trim()).map_err(|_| ValidationError::InvalidEmail.message(lang))?;
    Ok(())
}

fn inbox_subject(form: &ContactForm) -> String {
    match form.subject.trim() {
        "" => format!("Wiadomość od {}", form.name.trim()),
        subject => format!("Kontakt: {subject}"),
    }
}

fn inbox_body(form: &ContactForm) -> String {
    let phone = match form.phone.trim() {
        "" => "-",
        phone => phone,
    };
    format!(
        "Od: {} <{}>\nTelefon: {phone}\n\n{}",
        form.name.trim(),
        form.email.trim(),
        form.message.trim()
    )
}
