//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - Finalizing bookings and orders
//! - `email_templates` - Confirmation and short notification emails

pub mod checkout;
pub mod email_templates;

pub use checkout::{CheckoutError, CheckoutService, Confirmation, ConfirmationKind};
