//! Record kinds the gateway knows how to store.

use portell_core::models::{Booking, Event, Order, Product};
use portell_core::{BookingId, EventId, OrderId, ProductId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::store::Collection;

/// A domain type persisted as a document in one [`Collection`].
pub trait Entity:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// Typed id for records of this kind.
    type Id: Copy
        + Eq
        + std::fmt::Debug
        + std::fmt::Display
        + Serialize
        + Send
        + Sync
        + From<Uuid>
        + Into<Uuid>;

    const COLLECTION: Collection;

    /// Document keys that may appear in filters and sorts, besides
    /// `id`, `created_at` and `updated_at`.
    const FIELDS: &'static [&'static str];
}

impl Entity for Product {
    type Id = ProductId;
    const COLLECTION: Collection = Collection::Product;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "name_en",
        "slug",
        "description",
        "description_en",
        "price",
        "category",
        "wine_type",
        "vintage",
        "grape_variety",
        "image_url",
        "stock",
        "active",
        "featured",
    ];
}

impl Entity for Event {
    type Id = EventId;
    const COLLECTION: Collection = Collection::Event;
    const FIELDS: &'static [&'static str] = &[
        "title",
        "title_en",
        "slug",
        "description",
        "description_en",
        "date",
        "time",
        "duration",
        "location",
        "address",
        "price",
        "capacity",
        "booked_count",
        "image_url",
        "event_type",
        "active",
    ];
}

impl Entity for Booking {
    type Id = BookingId;
    const COLLECTION: Collection = Collection::Booking;
    const FIELDS: &'static [&'static str] = &[
        "event_id",
        "customer_name",
        "customer_email",
        "customer_phone",
        "guests",
        "special_requests",
        "total_price",
        "status",
        "payment_status",
        "confirmation_code",
        "gdpr_consent",
    ];
}

impl Entity for Order {
    type Id = OrderId;
    const COLLECTION: Collection = Collection::Order;
    const FIELDS: &'static [&'static str] = &[
        "order_number",
        "customer_name",
        "customer_email",
        "customer_phone",
        "shipping_address",
        "billing_address",
        "items",
        "subtotal",
        "shipping_cost",
        "total",
        "payment_method",
        "status",
        "payment_status",
        "gdpr_consent",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::tests::tasting;

    #[test]
    fn test_event_fields_cover_serialized_keys() {
        let value = serde_json::to_value(tasting(10, 2)).unwrap_or_default();
        let keys: Vec<&str> = value
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert!(!keys.is_empty());
        for key in keys {
            assert!(Event::FIELDS.contains(&key), "missing {key}");
        }
    }
}
