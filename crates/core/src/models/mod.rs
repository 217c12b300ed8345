//! Records stored through the data gateway.

pub mod address;
pub mod booking;
pub mod event;
pub mod order;
pub mod product;

use serde::{Deserialize, Serialize};

pub use address::{Address, DEFAULT_COUNTRY};
pub use booking::{Booking, initial_payment_status};
pub use event::{Availability, Event, parse_duration};
pub use order::{Order, OrderError, OrderItem, SHIPPING_COST};
pub use product::Product;

/// Name, email and phone of the person booking or ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl Contact {
    /// All three fields carry something other than whitespace.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
    }
}
