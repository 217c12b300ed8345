//! The four-step checkout wizard.
//!
//! ```text
//! ContactDetails(1) -> Payment(2) -> Review(3) -> Confirmation(4)
//! ```
//!
//! The wizard is serialized into the session between requests. It never
//! talks to the gateway: when the customer confirms on the review step,
//! [`CheckoutWizard::advance`] returns [`Advance::Finalize`] and the caller
//! runs finalization, then calls [`CheckoutWizard::complete`] on success.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::models::{Address, Contact, SHIPPING_COST};
use crate::reservation::EventReservation;
use crate::types::{Email, PaymentMethod};
use crate::validation::ValidationError;

/// Where the customer entered checkout from, read from `?type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutOrigin {
    #[default]
    Product,
    Event,
}

impl CheckoutOrigin {
    /// Anything other than `event` is a product checkout.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("event") => Self::Event,
            _ => Self::Product,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Event => "event",
        }
    }
}

/// What is being bought, fixed when checkout starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutSubject {
    Cart { lines: Vec<CartLine> },
    EventReservation { reservation: EventReservation },
}

impl CheckoutSubject {
    #[must_use]
    pub const fn origin(&self) -> CheckoutOrigin {
        match self {
            Self::Cart { .. } => CheckoutOrigin::Product,
            Self::EventReservation { .. } => CheckoutOrigin::Event,
        }
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        match self {
            Self::Cart { lines } => lines.iter().map(CartLine::line_total).sum(),
            Self::EventReservation { reservation } => reservation.total(),
        }
    }

    #[must_use]
    pub const fn shipping_cost(&self) -> Decimal {
        SHIPPING_COST
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal() + self.shipping_cost()
    }

    #[must_use]
    pub const fn needs_shipping(&self) -> bool {
        matches!(self, Self::Cart { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    ContactDetails,
    Payment,
    Review,
    Confirmation,
}

impl CheckoutStep {
    /// One-based position shown in the progress bar.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::ContactDetails => 1,
            Self::Payment => 2,
            Self::Review => 3,
            Self::Confirmation => 4,
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::ContactDetails => Self::Payment,
            Self::Payment => Self::Review,
            Self::Review | Self::Confirmation => Self::Confirmation,
        }
    }

    const fn previous(self) -> Option<Self> {
        match self {
            Self::ContactDetails | Self::Confirmation => None,
            Self::Payment => Some(Self::ContactDetails),
            Self::Review => Some(Self::Payment),
        }
    }
}

/// Payment step input. Nothing is charged; card fields are only checked for
/// presence and are never written to an order.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub card_expiry: String,
    #[serde(default)]
    pub card_cvv: String,
}

impl PaymentDetails {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.method {
            PaymentMethod::Card => [
                &self.card_number,
                &self.card_name,
                &self.card_expiry,
                &self.card_cvv,
            ]
            .iter()
            .all(|field| !field.trim().is_empty()),
            PaymentMethod::Transfer | PaymentMethod::Cod => true,
        }
    }

    /// Last four digits for the review step, e.g. `•••• 4242`.
    #[must_use]
    pub fn masked_card(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        let tail: String = digits.iter().skip(digits.len().saturating_sub(4)).collect();
        format!("•••• {tail}")
    }
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("method", &self.method)
            .field("card_number", &"[REDACTED]")
            .field("card_name", &"[REDACTED]")
            .field("card_expiry", &"[REDACTED]")
            .field("card_cvv", &"[REDACTED]")
            .finish()
    }
}

/// Result of [`CheckoutWizard::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given step.
    Moved(CheckoutStep),
    /// Review confirmed; run finalization.
    Finalize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutWizard {
    pub step: CheckoutStep,
    pub subject: CheckoutSubject,
    pub contact: Contact,
    pub shipping: Address,
    pub billing: Address,
    pub billing_same_as_shipping: bool,
    pub payment: PaymentDetails,
    pub consent: bool,
}

impl CheckoutWizard {
    /// Start a wizard for `subject`. An event reservation already carries
    /// the contact details and consent from the booking form.
    #[must_use]
    pub fn new(subject: CheckoutSubject) -> Self {
        let (contact, consent) = match &subject {
            CheckoutSubject::EventReservation { reservation } => {
                (reservation.contact.clone(), reservation.gdpr_consent)
            }
            CheckoutSubject::Cart { .. } => (Contact::default(), false),
        };
        Self {
            step: CheckoutStep::ContactDetails,
            subject,
            contact,
            shipping: Address::default(),
            billing: Address::default(),
            billing_same_as_shipping: true,
            payment: PaymentDetails::default(),
            consent,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> CheckoutOrigin {
        self.subject.origin()
    }

    /// Validate the current step and move forward.
    ///
    /// On the review step this does not move: it returns
    /// [`Advance::Finalize`] once consent is given.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the current step; the step is
    /// left unchanged.
    pub fn advance(&mut self) -> Result<Advance, ValidationError> {
        match self.step {
            CheckoutStep::ContactDetails => self.validate_contact()?,
            CheckoutStep::Payment => self.validate_payment()?,
            CheckoutStep::Review => {
                if !self.consent {
                    return Err(ValidationError::ConsentRequired);
                }
                return Ok(Advance::Finalize);
            }
            CheckoutStep::Confirmation => return Ok(Advance::Moved(self.step)),
        }
        self.step = self.step.next();
        Ok(Advance::Moved(self.step))
    }

    /// Go back one step. Returns `false` on the first step and after confirmation.
    pub fn back(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Mark finalization as done.
    pub fn complete(&mut self) {
        self.step = CheckoutStep::Confirmation;
    }

    /// Step 1: contact always, plus addresses for product orders.
    ///
    /// # Errors
    ///
    /// Returns the first missing piece.
    pub fn validate_contact(&self) -> Result<(), ValidationError> {
        if !self.contact.is_complete() {
            return Err(ValidationError::MissingContact);
        }
        Email::parse(&self.contact.email).map_err(|_| ValidationError::InvalidEmail)?;
        if self.subject.needs_shipping() {
            if !self.shipping.is_complete() {
                return Err(ValidationError::IncompleteShipping);
            }
            if !self.billing_same_as_shipping && !self.billing.is_complete() {
                return Err(ValidationError::IncompleteBilling);
            }
        }
        Ok(())
    }

    /// Step 2: card fields present when paying by card.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteCard`].
    pub fn validate_payment(&self) -> Result<(), ValidationError> {
        if self.payment.is_complete() {
            Ok(())
        } else {
            Err(ValidationError::IncompleteCard)
        }
    }

    /// Billing address as it will be stored on the order.
    #[must_use]
    pub fn resolved_billing(&self) -> Address {
        if self.billing_same_as_shipping {
            self.shipping.clone()
        } else {
            self.billing.clone()
        }
    }
}
