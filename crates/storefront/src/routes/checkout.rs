//! Checkout wizard route handlers.
//!
//! # Flow
//!
//! ```text
//! GET  /checkout?type=product|event  -> build or resume the wizard
//! POST /checkout (action=next|back)  -> apply step fields, move
//! review + next                      -> finalize -> /checkout/confirmation
//! ```
//!
//! Each POST redirects back to `GET /checkout` on success so a reload never
//! resubmits a step. Validation and finalization errors re-render the
//! current step with the message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use portell_core::checkout::{
    Advance, CheckoutOrigin, CheckoutStep, CheckoutSubject, CheckoutWizard,
};
use portell_core::models::Address;
use portell_core::{Language, PaymentMethod, ValidationError, format_pln};
use portell_gateway::GatewayError;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::i18n::Labels;
use crate::middleware::{ClientEvent, ClientState};
use crate::services::{CheckoutError, CheckoutService, Confirmation, ConfirmationKind};
use crate::state::AppState;
use crate::views::{Chrome, Choice};

/// Checkout entry query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    #[serde(rename = "type")]
    pub origin: Option<String>,
}

/// Fields of every wizard step. Only those of the current step are read.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    pub billing_same: Option<String>,
    #[serde(default)]
    pub billing_street: String,
    #[serde(default)]
    pub billing_city: String,
    #[serde(default)]
    pub billing_postal_code: String,
    #[serde(default)]
    pub billing_country: String,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub card_expiry: String,
    #[serde(default)]
    pub card_cvv: String,
    pub consent: Option<String>,
}

/// One step in the progress bar.
pub struct StepView {
    pub number: u8,
    pub label: &'static str,
    pub current: bool,
    pub done: bool,
}

/// Order summary line.
pub struct SummaryLine {
    pub name: String,
    pub quantity: u32,
    pub total: String,
}

/// Checkout wizard page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub chrome: Chrome,
    pub wizard: CheckoutWizard,
    pub step: u8,
    pub steps: Vec<StepView>,
    pub is_event: bool,
    pub summary: Vec<SummaryLine>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub methods: Vec<Choice>,
    pub payment_label: &'static str,
    pub masked_card: String,
    pub shipping_line: String,
    pub billing_line: String,
    pub submit_label: &'static str,
    pub error: Option<String>,
}

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub chrome: Chrome,
    pub confirmation: Confirmation,
    pub is_booking: bool,
    pub google_url: String,
    pub outlook_url: String,
    pub yahoo_url: String,
}

/// Start or resume checkout.
///
/// A product checkout needs a non-empty cart, an event checkout needs the
/// reservation from the booking form.
#[instrument(skip(client))]
pub async fn show(client: ClientState, Query(params): Query<CheckoutQuery>) -> Result<Response> {
    let origin = CheckoutOrigin::parse(params.origin.as_deref());
    let lang = client.language();

    let wizard = match origin {
        CheckoutOrigin::Product => {
            let cart = client.cart().await;
            if cart.is_empty() {
                return Ok(Redirect::to("/cart").into_response());
            }
            let lines = cart.into_lines();
            match client.checkout().await {
                Some(mut wizard) if resumable(&wizard, origin) => {
                    let unchanged = matches!(
                        &wizard.subject,
                        CheckoutSubject::Cart { lines: current } if *current == lines
                    );
                    if !unchanged {
                        // Cart changed in another tab; keep the contact details.
                        wizard.subject = CheckoutSubject::Cart { lines };
                        wizard.step = CheckoutStep::ContactDetails;
                    }
                    wizard
                }
                _ => CheckoutWizard::new(CheckoutSubject::Cart { lines }),
            }
        }
        CheckoutOrigin::Event => {
            let Some(reservation) = client.checkout_item().await else {
                client
                    .flash(Labels::for_lang(lang).missing_event_data)
                    .await?;
                return Ok(Redirect::to("/events").into_response());
            };
            let same_reservation = |wizard: &CheckoutWizard| {
                matches!(
                    &wizard.subject,
                    CheckoutSubject::EventReservation { reservation: current } if *current == reservation
                )
            };
            match client.checkout().await {
                Some(wizard) if resumable(&wizard, origin) && same_reservation(&wizard) => wizard,
                _ => CheckoutWizard::new(CheckoutSubject::EventReservation { reservation }),
            }
        }
    };

    client.save_checkout(&wizard).await?;
    Ok(render(&client, wizard, None).await.into_response())
}

/// Apply the submitted step and move the wizard.
///
/// # Errors
///
/// Returns error if the session cannot be written. Finalization failures
/// are shown on the review step instead.
#[instrument(skip(state, client, form), fields(action = %form.action))]
pub async fn submit(
    State(state): State<AppState>,
    client: ClientState,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let Some(mut wizard) = client.checkout().await else {
        return Ok(Redirect::to("/cart").into_response());
    };
    if wizard.step == CheckoutStep::Confirmation {
        return Ok(Redirect::to("/checkout/confirmation").into_response());
    }
    let lang = client.language();

    apply_step(&mut wizard, &form);

    if form.action == "back" {
        wizard.back();
        client.save_checkout(&wizard).await?;
        return Ok(resume(&wizard));
    }

    match wizard.advance() {
        Ok(Advance::Moved(step)) => {
            tracing::debug!(step = step.number(), "Checkout step advanced");
            client.save_checkout(&wizard).await?;
            Ok(resume(&wizard))
        }
        Ok(Advance::Finalize) => finalize(&state, &client, wizard, lang).await,
        Err(err) => {
            client.save_checkout(&wizard).await?;
            Ok(render(&client, wizard, Some(err.message(lang).to_owned()))
                .await
                .into_response())
        }
    }
}

/// Show the last confirmation.
#[instrument(skip(client))]
pub async fn confirmation(client: ClientState) -> Result<Response> {
    let Some(confirmation) = client.last_confirmation().await else {
        return Ok(Redirect::to("/").into_response());
    };
    let (google_url, outlook_url, yahoo_url) = confirmation
        .calendar
        .as_ref()
        .map(|c| (c.google_url(), c.outlook_url(), c.yahoo_url()))
        .unwrap_or_default();

    Ok(ConfirmationTemplate {
        chrome: Chrome::load(&client).await,
        is_booking: confirmation.kind == ConfirmationKind::Booking,
        confirmation,
        google_url,
        outlook_url,
        yahoo_url,
    }
    .into_response())
}

async fn finalize(
    state: &AppState,
    client: &ClientState,
    mut wizard: CheckoutWizard,
    lang: Language,
) -> Result<Response> {
    let service = CheckoutService::new(
        state.gateway(),
        state.mailer(),
        state.config().atomic_bookings,
    );

    match service.finalize(&wizard, lang).await {
        Ok(confirmation) => {
            wizard.complete();
            client.clear_checkout().await?;
            client.set_last_confirmation(&confirmation).await?;
            match confirmation.kind {
                ConfirmationKind::Booking => {
                    client.clear_checkout_item().await?;
                    Ok(Redirect::to("/checkout/confirmation").into_response())
                }
                ConfirmationKind::Order => {
                    let event: ClientEvent = client.update_cart(|cart| cart.clear()).await?;
                    Ok((event, Redirect::to("/checkout/confirmation")).into_response())
                }
            }
        }
        Err(err) => {
            tracing::error!(error = %err, origin = wizard.origin().code(), "Checkout finalization failed");
            let message = finalize_error_message(&err, lang);
            client.save_checkout(&wizard).await?;
            Ok(render(client, wizard, Some(message)).await.into_response())
        }
    }
}

/// Known failures get their own localized text. Anything else shows the
/// generic text followed by the store's own message.
fn finalize_error_message(err: &CheckoutError, lang: Language) -> String {
    let t = Labels::for_lang(lang);
    match err {
        CheckoutError::Gateway(GatewayError::CapacityExceeded { .. }) => {
            ValidationError::NotEnoughSpots.message(lang).to_owned()
        }
        CheckoutError::Gateway(GatewayError::NotFound { .. }) => t.event_not_found.to_owned(),
        other => format!("{} ({other})", t.processing_failed),
    }
}

fn resumable(wizard: &CheckoutWizard, origin: CheckoutOrigin) -> bool {
    wizard.origin() == origin && wizard.step != CheckoutStep::Confirmation
}

fn resume(wizard: &CheckoutWizard) -> Response {
    Redirect::to(&format!("/checkout?type={}", wizard.origin().code())).into_response()
}

fn apply_step(wizard: &mut CheckoutWizard, form: &CheckoutForm) {
    match wizard.step {
        CheckoutStep::ContactDetails => {
            wizard.contact.name = form.name.trim().to_owned();
            wizard.contact.email = form.email.trim().to_owned();
            wizard.contact.phone = form.phone.trim().to_owned();
            if wizard.subject.needs_shipping() {
                wizard.shipping = address(&form.street, &form.city, &form.postal_code, &form.country);
                wizard.billing_same_as_shipping = form.billing_same.is_some();
                if !wizard.billing_same_as_shipping {
                    wizard.billing = address(
                        &form.billing_street,
                        &form.billing_city,
                        &form.billing_postal_code,
                        &form.billing_country,
                    );
                }
            }
        }
        CheckoutStep::Payment => {
            if let Some(method) = form
                .payment_method
                .as_deref()
                .and_then(|raw| raw.parse::<PaymentMethod>().ok())
            {
                wizard.payment.method = method;
            }
            wizard.payment.card_number = form.card_number.trim().to_owned();
            wizard.payment.card_name = form.card_name.trim().to_owned();
            wizard.payment.card_expiry = form.card_expiry.trim().to_owned();
            wizard.payment.card_cvv = form.card_cvv.trim().to_owned();
        }
        CheckoutStep::Review => {
            wizard.consent = form.consent.is_some();
        }
        CheckoutStep::Confirmation => {}
    }
}

fn address(street: &str, city: &str, postal_code: &str, country: &str) -> Address {
    let mut address = Address {
        street: street.trim().to_owned(),
        city: city.trim().to_owned(),
        postal_code: postal_code.trim().to_owned(),
        ..Address::default()
    };
    if !country.trim().is_empty() {
        country.trim().clone_into(&mut address.country);
    }
    address
}

async fn render(
    client: &ClientState,
    wizard: CheckoutWizard,
    error: Option<String>,
) -> CheckoutTemplate {
    let lang = client.language();
    let t = Labels::for_lang(lang);
    let current = wizard.step.number();

    let steps = [
        (1, t.step_contact),
        (2, t.step_payment),
        (3, t.step_review),
        (4, t.step_confirmation),
    ]
    .into_iter()
    .map(|(number, label)| StepView {
        number,
        label,
        current: number == current,
        done: number < current,
    })
    .collect();

    let summary = match &wizard.subject {
        CheckoutSubject::Cart { lines } => lines
            .iter()
            .map(|line| SummaryLine {
                name: line.name.clone(),
                quantity: line.quantity,
                total: format_pln(line.line_total()),
            })
            .collect(),
        CheckoutSubject::EventReservation { reservation } => vec![SummaryLine {
            name: reservation.name.clone(),
            quantity: reservation.quantity,
            total: format_pln(reservation.total()),
        }],
    };

    let is_event = wizard.origin() == CheckoutOrigin::Event;
    let shipping_cost = wizard.subject.shipping_cost();
    let method = wizard.payment.method;

    CheckoutTemplate {
        chrome: Chrome::load(client).await,
        step: current,
        steps,
        is_event,
        summary,
        subtotal: format_pln(wizard.subject.subtotal()),
        shipping: if shipping_cost.is_zero() {
            t.free_shipping.to_owned()
        } else {
            format_pln(shipping_cost)
        },
        total: format_pln(wizard.subject.total()),
        methods: PaymentMethod::ALL
            .iter()
            .map(|m| Choice::new(m.code(), m.label(lang), method.code()))
            .collect(),
        payment_label: method.label(lang),
        masked_card: wizard.payment.masked_card(),
        shipping_line: wizard.shipping.one_line(),
        billing_line: wizard.resolved_billing().one_line(),
        submit_label: match (wizard.step, is_event) {
            (CheckoutStep::Review, true) => t.confirm_booking,
            (CheckoutStep::Review, false) => t.place_order,
            _ => t.next,
        },
        error,
        wizard,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use portell_core::cart::CartLine;
    use portell_core::{EventId, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn cart_wizard() -> CheckoutWizard {
        CheckoutWizard::new(CheckoutSubject::Cart {
            lines: vec![CartLine {
                id: ProductId::new(),
                name: "Regent 2021".to_owned(),
                price: Decimal::new(60, 0),
                image_url: String::new(),
                quantity: 1,
            }],
        })
    }

    #[test]
    fn test_apply_contact_step_reads_addresses() {
        let mut wizard = cart_wizard();
        let form = CheckoutForm {
            name: " Anna ".to_owned(),
            email: "anna@example.com".to_owned(),
            phone: "600".to_owned(),
            street: "ul. Winna 1".to_owned(),
            city: "Zielona Góra".to_owned(),
            postal_code: "65-001".to_owned(),
            billing_same: None,
            billing_street: "ul. Polna 2".to_owned(),
            billing_city: "Poznań".to_owned(),
            billing_postal_code: "60-001".to_owned(),
            ..CheckoutForm::default()
        };
        apply_step(&mut wizard, &form);

        assert_eq!(wizard.contact.name, "Anna");
        assert_eq!(wizard.shipping.country, "Polska");
        assert!(!wizard.billing_same_as_shipping);
        assert_eq!(wizard.resolved_billing().city, "Poznań");
    }

    #[test]
    fn test_apply_payment_step_ignores_unknown_method() {
        let mut wizard = cart_wizard();
        wizard.step = CheckoutStep::Payment;
        let form = CheckoutForm {
            payment_method: Some("bitcoin".to_owned()),
            ..CheckoutForm::default()
        };
        apply_step(&mut wizard, &form);
        assert_eq!(wizard.payment.method, PaymentMethod::Card);

        let form = CheckoutForm {
            payment_method: Some("cod".to_owned()),
            ..CheckoutForm::default()
        };
        apply_step(&mut wizard, &form);
        assert_eq!(wizard.payment.method, PaymentMethod::Cod);
    }

    #[test]
    fn test_finalize_error_messages() {
        let capacity = CheckoutError::Gateway(GatewayError::CapacityExceeded {
            requested: 3,
            available: 1,
        });
        assert_eq!(
            finalize_error_message(&capacity, Language::En),
            "Not enough spots available"
        );

        let backend = CheckoutError::Gateway(GatewayError::Backend("disk full".to_owned()));
        assert_eq!(
            finalize_error_message(&backend, Language::En),
            "An error occurred while processing. Please try again. (disk full)"
        );

        let missing = CheckoutError::Gateway(GatewayError::NotFound {
            collection: "event",
            id: EventId::new().to_string(),
        });
        assert_eq!(
            finalize_error_message(&missing, Language::Pl),
            Labels::for_lang(Language::Pl).event_not_found
        );
    }

    #[test]
    fn test_resumable_only_for_same_origin() {
        let wizard = cart_wizard();
        assert!(resumable(&wizard, CheckoutOrigin::Product));
        assert!(!resumable(&wizard, CheckoutOrigin::Event));
    }
}
