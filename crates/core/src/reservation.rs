//! Event booking form and the reservation it hands to checkout.
//!
//! Submitting the booking form does not write anything. It validates the
//! request against the event as read for this request and produces an
//! [`EventReservation`], which the storefront keeps in the session until
//! checkout finalizes or discards it. Capacity is not checked again at
//! finalization time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Contact, Event};
use crate::types::{Email, EventId, Language};
use crate::validation::ValidationError;

/// Fields of the booking form on the event page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    /// Kept as typed so a blank or garbled count re-renders the form.
    #[serde(default)]
    pub guests: String,
    #[serde(default)]
    pub special_requests: String,
    /// HTML checkboxes post `on` when ticked and nothing otherwise.
    #[serde(default)]
    pub gdpr_consent: Option<String>,
}

impl BookingForm {
    #[must_use]
    pub fn consented(&self) -> bool {
        self.gdpr_consent
            .as_deref()
            .is_some_and(|v| matches!(v, "on" | "true" | "1" | "yes"))
    }

    /// Guest count as a positive number, `None` when blank, zero or not a
    /// number.
    #[must_use]
    pub fn guest_count(&self) -> Option<u32> {
        self.guests.trim().parse().ok().filter(|&n: &u32| n >= 1)
    }
}

/// A validated single-event checkout item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReservation {
    pub event_id: EventId,
    /// Event title in the language used when booking.
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: String,
    pub contact: Contact,
    #[serde(default)]
    pub special_requests: String,
    pub gdpr_consent: bool,
}

impl EventReservation {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Validate a booking form against the event it was submitted for.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, checked in the order
/// contact, email, consent, guest count, capacity.
pub fn reserve(
    event_id: EventId,
    event: &Event,
    form: &BookingForm,
    lang: Language,
) -> Result<EventReservation, ValidationError> {
    if !event.active {
        return Err(ValidationError::EventUnavailable);
    }

    let contact = Contact {
        name: form.customer_name.trim().to_owned(),
        email: form.customer_email.trim().to_owned(),
        phone: form.customer_phone.trim().to_owned(),
    };
    if !contact.is_complete() {
        return Err(ValidationError::MissingContact);
    }
    Email::parse(&contact.email).map_err(|_| ValidationError::InvalidEmail)?;

    if !form.consented() {
        return Err(ValidationError::BookingConsentRequired);
    }
    let guests = form.guest_count().ok_or(ValidationError::NoGuests)?;
    if i64::from(guests) > event.availability().spots_left {
        return Err(ValidationError::NotEnoughSpots);
    }

    Ok(EventReservation {
        event_id,
        name: event.localized_title(lang).to_owned(),
        unit_price: event.price,
        quantity: guests,
        image_url: event.image_url.clone(),
        contact,
        special_requests: form.special_requests.trim().to_owned(),
        gdpr_consent: true,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::event::tests::tasting;

    fn form(guests: u32) -> BookingForm {
        BookingForm {
            customer_name: "Jan Kowalski".to_owned(),
            customer_email: "jan@example.com".to_owned(),
            customer_phone: "600 100 200".to_owned(),
            guests: guests.to_string(),
            special_requests: "Stolik przy oknie".to_owned(),
            gdpr_consent: Some("on".to_owned()),
        }
    }

    #[test]
    fn test_reserve_builds_handoff() {
        let id = EventId::new();
        let reservation = reserve(id, &tasting(10, 8), &form(2), Language::En).unwrap();

        assert_eq!(reservation.event_id, id);
        assert_eq!(reservation.name, "Wine tasting");
        assert_eq!(reservation.quantity, 2);
        assert_eq!(reservation.total(), Decimal::new(300, 0));
        assert_eq!(reservation.contact.name, "Jan Kowalski");
        assert!(reservation.gdpr_consent);
    }

    #[test]
    fn test_reserve_rejects_more_guests_than_spots() {
        let err = reserve(EventId::new(), &tasting(10, 8), &form(3), Language::Pl).unwrap_err();
        assert_eq!(err, ValidationError::NotEnoughSpots);
        assert_eq!(
            err.message(Language::Pl),
            "Niewystarczająca liczba wolnych miejsc"
        );
    }

    #[test]
    fn test_reserve_requires_consent() {
        let mut f = form(1);
        f.gdpr_consent = None;
        let err = reserve(EventId::new(), &tasting(10, 0), &f, Language::En).unwrap_err();
        assert_eq!(err, ValidationError::BookingConsentRequired);
        assert_eq!(err.message(Language::En), "Please consent to data processing");
    }

    #[test]
    fn test_reserve_requires_contact_fields() {
        let mut f = form(1);
        f.customer_phone = "   ".to_owned();
        let err = reserve(EventId::new(), &tasting(10, 0), &f, Language::Pl).unwrap_err();
        assert_eq!(err, ValidationError::MissingContact);
    }

    #[test]
    fn test_reserve_rejects_bad_email_and_zero_guests() {
        let mut f = form(1);
        f.customer_email = "jan".to_owned();
        assert_eq!(
            reserve(EventId::new(), &tasting(10, 0), &f, Language::Pl).unwrap_err(),
            ValidationError::InvalidEmail
        );
        assert_eq!(
            reserve(EventId::new(), &tasting(10, 0), &form(0), Language::Pl).unwrap_err(),
            ValidationError::NoGuests
        );
    }

    #[test]
    fn test_reserve_rejects_unreadable_guest_count() {
        for raw in ["", "  ", "abc", "-1", "2.5", "99999999999"] {
            let mut f = form(1);
            f.guests = raw.to_owned();
            assert_eq!(
                reserve(EventId::new(), &tasting(10, 0), &f, Language::En).unwrap_err(),
                ValidationError::NoGuests,
                "guests = {raw:?}"
            );
        }
        let mut f = form(1);
        f.guests = " 2 ".to_owned();
        assert_eq!(f.guest_count(), Some(2));
    }

    #[test]
    fn test_reserve_rejects_full_or_inactive_event() {
        assert_eq!(
            reserve(EventId::new(), &tasting(10, 10), &form(1), Language::Pl).unwrap_err(),
            ValidationError::NotEnoughSpots
        );
        let mut hidden = tasting(10, 0);
        hidden.active = false;
        assert_eq!(
            reserve(EventId::new(), &hidden, &form(1), Language::Pl).unwrap_err(),
            ValidationError::EventUnavailable
        );
    }
}
