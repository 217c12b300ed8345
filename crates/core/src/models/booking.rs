//! Event bookings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BookingStatus, EventId, PaymentStatus};

/// A confirmed reservation of seats at an [`Event`](super::Event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub event_id: EventId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub guests: u32,
    #[serde(default)]
    pub special_requests: String,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub confirmation_code: String,
    pub gdpr_consent: bool,
}

/// Payment state of a new booking: free events need no payment.
#[must_use]
pub fn initial_payment_status(unit_price: Decimal) -> PaymentStatus {
    if unit_price.is_zero() {
        PaymentStatus::Free
    } else {
        PaymentStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_events_are_marked_free() {
        assert_eq!(initial_payment_status(Decimal::ZERO), PaymentStatus::Free);
        assert_eq!(
            initial_payment_status(Decimal::new(150, 0)),
            PaymentStatus::Pending
        );
    }
}
