//! Checkout finalization: turning a confirmed wizard into a stored booking
//! or order and a confirmation email.
//!
//! # Flow
//!
//! ```text
//! Event:   re-read event -> [reserve seats] -> create booking
//!          -> [booked_count += guests] -> email
//! Product: create order -> email
//! ```
//!
//! Writes are not compensated: if a later write fails the earlier ones stay.
//! Email delivery never fails a checkout; it only sets `email_warning`.

use chrono::{DateTime, Datelike, Utc};
use portell_core::calendar::CalendarEvent;
use portell_core::checkout::{CheckoutSubject, CheckoutWizard};
use portell_core::codes::{confirmation_code, order_number};
use portell_core::models::{Booking, Order, OrderError, OrderItem, initial_payment_status};
use portell_core::reservation::EventReservation;
use portell_core::{BookingStatus, Language};
use portell_gateway::mailer::{EmailMessage, Mailer};
use portell_gateway::{Gateway, GatewayError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::services::email_templates::{
    BookingEmail, OrderEmail, booking_subject, order_subject, render_booking_confirmation,
    render_order_confirmation,
};

/// Finalization failures. The wizard stays on the review step.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Invalid order: {0}")]
    Order(#[from] OrderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationKind {
    Booking,
    Order,
}

/// What the confirmation step shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub kind: ConfirmationKind,
    /// Booking confirmation code or order number.
    pub number: String,
    /// The booked event, for calendar export. `None` for orders.
    pub calendar: Option<CalendarEvent>,
    /// The record was stored but the confirmation email did not go out.
    pub email_warning: bool,
}

/// Finalizes checkouts against the gateway and mailer.
pub struct CheckoutService<'a> {
    gateway: &'a Gateway,
    mailer: &'a dyn Mailer,
    atomic_bookings: bool,
}

impl<'a> CheckoutService<'a> {
    /// `atomic_bookings` selects the bounded seat increment instead of
    /// read-modify-write on `booked_count`.
    #[must_use]
    pub const fn new(gateway: &'a Gateway, mailer: &'a dyn Mailer, atomic_bookings: bool) -> Self {
        Self {
            gateway,
            mailer,
            atomic_bookings,
        }
    }

    /// Store the wizard's booking or order and send its confirmation.
    ///
    /// # Errors
    ///
    /// Returns the first gateway failure. Anything written before it stays
    /// written.
    pub async fn finalize(
        &self,
        wizard: &CheckoutWizard,
        lang: Language,
    ) -> Result<Confirmation, CheckoutError> {
        self.finalize_at(wizard, lang, Utc::now()).await
    }

    /// [`finalize`](Self::finalize) with an explicit clock.
    ///
    /// # Errors
    ///
    /// Same as [`finalize`](Self::finalize).
    pub async fn finalize_at(
        &self,
        wizard: &CheckoutWizard,
        lang: Language,
        now: DateTime<Utc>,
    ) -> Result<Confirmation, CheckoutError> {
        match &wizard.subject {
            CheckoutSubject::EventReservation { reservation } => {
                self.finalize_booking(reservation, lang, now).await
            }
            CheckoutSubject::Cart { lines } => {
                let items = lines.iter().map(OrderItem::from).collect();
                self.finalize_order(wizard, items, lang, now).await
            }
        }
    }

    #[instrument(skip(self, reservation, now), fields(event_id = %reservation.event_id, guests = reservation.quantity))]
    async fn finalize_booking(
        &self,
        reservation: &EventReservation,
        lang: Language,
        now: DateTime<Utc>,
    ) -> Result<Confirmation, CheckoutError> {
        let event_id = reservation.event_id;
        let event_id_str = event_id.to_string();
        add_breadcrumb(
            "checkout",
            "Finalizing booking",
            Some(&[("event_id", event_id_str.as_str())]),
        );

        let event = self.gateway.events.get(event_id).await?;

        if self.atomic_bookings {
            self.gateway
                .events
                .reserve_seats(event_id, reservation.quantity)
                .await?;
        }

        let code = confirmation_code(now, &mut rand::rng());
        let booking = Booking {
            event_id,
            customer_name: reservation.contact.name.clone(),
            customer_email: reservation.contact.email.clone(),
            customer_phone: reservation.contact.phone.clone(),
            guests: reservation.quantity,
            special_requests: reservation.special_requests.clone(),
            total_price: reservation.total(),
            status: BookingStatus::Confirmed,
            payment_status: initial_payment_status(reservation.unit_price),
            confirmation_code: code.clone(),
            gdpr_consent: reservation.gdpr_consent,
        };
        let stored = self.gateway.bookings.create(&booking).await?;
        tracing::info!(booking_id = %stored.id, confirmation_code = %code, "Booking created");

        if !self.atomic_bookings {
            // Read-modify-write against the copy read above; concurrent
            // bookings can overrun capacity here.
            let booked_count = event.booked_count + i64::from(reservation.quantity);
            self.gateway
                .events
                .update(event_id, &json!({ "booked_count": booked_count }))
                .await?;
        }

        let email = BookingEmail {
            customer_name: booking.customer_name.clone(),
            event_title: event.localized_title(lang).to_owned(),
            event_date: event.date,
            event_time: event.time,
            location: event.full_location(),
            guests: booking.guests,
            total_price: booking.total_price,
            special_requests: booking.special_requests.clone(),
            confirmation_code: code.clone(),
            year: now.year(),
        };
        let email_warning = !self
            .deliver(
                &booking.customer_email,
                booking_subject(&email.event_title, lang),
                render_booking_confirmation(&email, lang),
            )
            .await;

        add_breadcrumb("checkout", "Booking finalized", Some(&[("code", code.as_str())]));
        Ok(Confirmation {
            kind: ConfirmationKind::Booking,
            number: code,
            calendar: Some(CalendarEvent::from_event(event_id, &event, lang)),
            email_warning,
        })
    }

    #[instrument(skip(self, wizard, items, now), fields(lines = items.len()))]
    async fn finalize_order(
        &self,
        wizard: &CheckoutWizard,
        items: Vec<OrderItem>,
        lang: Language,
        now: DateTime<Utc>,
    ) -> Result<Confirmation, CheckoutError> {
        add_breadcrumb("checkout", "Finalizing order", None);

        let number = order_number(now);
        let order = Order::from_lines(
            number.clone(),
            &wizard.contact,
            wizard.shipping.clone(),
            wizard.resolved_billing(),
            items,
            wizard.payment.method,
        )?;
        let stored = self.gateway.orders.create(&order).await?;
        tracing::info!(order_id = %stored.id, order_number = %number, total = %order.total, "Order created");

        let email = OrderEmail {
            customer_name: order.customer_name.clone(),
            order_number: number.clone(),
            items: order.items.clone(),
            subtotal: order.subtotal,
            shipping_cost: order.shipping_cost,
            total: order.total,
            shipping_address: order.shipping_address.clone(),
            payment_method: order.payment_method,
            year: now.year(),
        };
        let email_warning = !self
            .deliver(
                &order.customer_email,
                order_subject(&number, lang),
                render_order_confirmation(&email, lang),
            )
            .await;

        add_breadcrumb("checkout", "Order finalized", Some(&[("order_number", number.as_str())]));
        Ok(Confirmation {
            kind: ConfirmationKind::Order,
            number,
            calendar: None,
            email_warning,
        })
    }

    /// Send a rendered confirmation. Returns whether it went out.
    async fn deliver(
        &self,
        to: &str,
        subject: String,
        html: Result<String, askama::Error>,
    ) -> bool {
        let html = match html {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(error = %e, "Failed to render confirmation email");
                return false;
            }
        };
        match self.mailer.send(&EmailMessage::html(to, subject, html)).await {
            Ok(sent) => {
                tracing::info!(email_id = %sent.id, "Confirmation email sent");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Confirmation email failed");
                false
            }
        }
    }
}
