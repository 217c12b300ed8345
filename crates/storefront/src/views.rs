//! Display models shared by page templates.
//!
//! Templates only see strings and flags prepared here, already localized
//! and formatted, so the markup stays free of logic.

use portell_core::models::{Event, Product};
use portell_core::{EventId, Language, ProductId, format_pln};
use portell_gateway::Record;
use rust_decimal::Decimal;

use crate::i18n::{Labels, format_date, format_time};
use crate::middleware::ClientState;

/// Header, footer and toast data every full page needs.
pub struct Chrome {
    pub t: &'static Labels,
    pub lang: &'static str,
    /// Language code the toggle switches to.
    pub switch_to: &'static str,
    pub cart_count: u32,
    pub toast: Option<String>,
}

impl Chrome {
    /// Read the visitor's language and cart, and take any pending toast.
    pub async fn load(client: &ClientState) -> Self {
        let lang = client.language();
        Self {
            t: Labels::for_lang(lang),
            lang: lang.code(),
            switch_to: lang.other().code(),
            cart_count: client.cart().await.item_count(),
            toast: client.take_flash().await,
        }
    }
}

/// Product tile on listings.
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub category: &'static str,
    pub vintage: Option<i32>,
    pub in_stock: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(record: &Record<Product>, lang: Language) -> Self {
        Self {
            id: record.id,
            name: record.localized_name(lang).to_owned(),
            price: format_pln(record.price),
            image_url: record.image_url.clone(),
            category: record.category.label(lang),
            vintage: record.vintage,
            in_stock: record.in_stock(),
        }
    }
}

/// Event tile on listings and recommendations.
pub struct EventCard {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub price: String,
    pub image_url: String,
    pub event_type: &'static str,
    pub spots_left: i64,
    pub is_full: bool,
    pub is_almost_full: bool,
}

impl EventCard {
    #[must_use]
    pub fn new(record: &Record<Event>, lang: Language) -> Self {
        let availability = record.availability();
        Self {
            id: record.id,
            title: record.localized_title(lang).to_owned(),
            description: record.localized_description(lang).to_owned(),
            date: format_date(record.date, lang),
            time: format_time(record.time),
            location: record.location.clone(),
            price: price_label(record.price, lang),
            image_url: record.image_url.clone(),
            event_type: record.event_type.label(lang),
            spots_left: availability.spots_left.max(0),
            is_full: availability.is_full,
            is_almost_full: availability.is_almost_full,
        }
    }
}

/// An `<option>` or tab.
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>, current: &str) -> Self {
        let value = value.into();
        let selected = value == current;
        Self {
            value,
            label: label.into(),
            selected,
        }
    }
}

/// Event price, or "free" when it costs nothing.
#[must_use]
pub fn price_label(amount: Decimal, lang: Language) -> String {
    if amount.is_zero() {
        Labels::for_lang(lang).free.to_owned()
    } else {
        format_pln(amount)
    }
}
