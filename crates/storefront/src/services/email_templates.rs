//! HTML confirmation emails for bookings and orders.
//!
//! Rendering is pure: everything that varies, the footer year included,
//! comes in through the input struct, so the same input always renders the
//! same document. Templates are `.html`, so askama escapes every value.

use askama::Template;
use chrono::{NaiveDate, NaiveTime};
use portell_core::models::{Address, OrderItem};
use portell_core::{Language, PaymentMethod, format_pln};
use rust_decimal::Decimal;

use crate::i18n::{Labels, format_date, format_time};

/// What the booking confirmation shows.
#[derive(Debug, Clone)]
pub struct BookingEmail {
    pub customer_name: String,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub guests: u32,
    pub total_price: Decimal,
    pub special_requests: String,
    pub confirmation_code: String,
    pub year: i32,
}

/// What the order confirmation shows.
#[derive(Debug, Clone)]
pub struct OrderEmail {
    pub customer_name: String,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    pub year: i32,
}

#[derive(Template)]
#[template(path = "email/booking_confirmation.html")]
struct BookingEmailTemplate<'a> {
    t: &'static Labels,
    lang: &'static str,
    email: &'a BookingEmail,
    date: String,
    time: String,
    total: String,
}

struct EmailLine {
    name: String,
    quantity: u32,
    total: String,
}

#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderEmailTemplate<'a> {
    t: &'static Labels,
    lang: &'static str,
    email: &'a OrderEmail,
    lines: Vec<EmailLine>,
    subtotal: String,
    shipping: String,
    total: String,
    payment_method: &'static str,
}

/// Render the booking confirmation.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn render_booking_confirmation(
    email: &BookingEmail,
    lang: Language,
) -> Result<String, askama::Error> {
    let t = Labels::for_lang(lang);
    let total = if email.total_price.is_zero() {
        t.free.to_owned()
    } else {
        format_pln(email.total_price)
    };

    BookingEmailTemplate {
        t,
        lang: lang.code(),
        email,
        date: format_date(email.event_date, lang),
        time: format_time(email.event_time),
        total,
    }
    .render()
}

/// Render the order confirmation.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn render_order_confirmation(
    email: &OrderEmail,
    lang: Language,
) -> Result<String, askama::Error> {
    let t = Labels::for_lang(lang);
    let shipping = if email.shipping_cost.is_zero() {
        t.free_shipping.to_owned()
    } else {
        format_pln(email.shipping_cost)
    };

    OrderEmailTemplate {
        t,
        lang: lang.code(),
        email,
        lines: email
            .items
            .iter()
            .map(|item| EmailLine {
                name: item.product_name.clone(),
                quantity: item.quantity,
                total: format_pln(item.line_total()),
            })
            .collect(),
        subtotal: format_pln(email.subtotal),
        shipping,
        total: format_pln(email.total),
        payment_method: email.payment_method.label(lang),
    }
    .render()
}

#[derive(Template)]
#[template(path = "email/note.html")]
struct NoteTemplate<'a> {
    t: &'static Labels,
    lang: &'static str,
    title: &'a str,
    greeting: Option<&'a str>,
    paragraphs: Vec<&'a str>,
    year: i32,
}

/// Render a short text email in the house layout.
///
/// Blank lines in `body` separate paragraphs; single newlines become line
/// breaks.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn render_note(
    title: &str,
    greeting: Option<&str>,
    body: &str,
    lang: Language,
    year: i32,
) -> Result<String, askama::Error> {
    NoteTemplate {
        t: Labels::for_lang(lang),
        lang: lang.code(),
        title,
        greeting,
        paragraphs: body
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect(),
        year,
    }
    .render()
}

#[must_use]
pub fn booking_subject(event_title: &str, lang: Language) -> String {
    format!("{} - {event_title}", Labels::for_lang(lang).email_booking_subject)
}

#[must_use]
pub fn order_subject(order_number: &str, lang: Language) -> String {
    format!("{} {order_number}", Labels::for_lang(lang).email_order_subject)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use portell_core::ProductId;

    use super::*;

    fn booking() -> BookingEmail {
        BookingEmail {
            customer_name: "Anna Nowak".to_owned(),
            event_title: "Degustacja win".to_owned(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            event_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            location: "Winnica Portell, ul. Winna 123".to_owned(),
            guests: 2,
            total_price: Decimal::new(300, 0),
            special_requests: String::new(),
            confirmation_code: "PORTELL-EVENT-1717000000000-ABC123XYZ".to_owned(),
            year: 2025,
        }
    }

    fn order() -> OrderEmail {
        OrderEmail {
            customer_name: "Jan Kowalski".to_owned(),
            order_number: "PORTELL-1717000000000".to_owned(),
            items: vec![OrderItem {
                product_id: ProductId::new(),
                product_name: "Regent 2021".to_owned(),
                quantity: 2,
                price: Decimal::new(6000, 2),
            }],
            subtotal: Decimal::new(120, 0),
            shipping_cost: Decimal::ZERO,
            total: Decimal::new(120, 0),
            shipping_address: Address {
                street: "ul. Polna 1".to_owned(),
                city: "Zielona Góra".to_owned(),
                postal_code: "65-001".to_owned(),
                country: "Polska".to_owned(),
            },
            payment_method: PaymentMethod::Transfer,
            year: 2025,
        }
    }

    #[test]
    fn test_booking_email_contains_details() {
        let html = render_booking_confirmation(&booking(), Language::Pl).unwrap();
        assert!(html.contains("PORTELL-EVENT-1717000000000-ABC123XYZ"));
        assert!(html.contains("1 czerwca 2025"));
        assert!(html.contains("18:00"));
        assert!(html.contains("300.00 PLN"));
        assert!(html.contains("Witaj Anna Nowak"));
        assert!(html.contains("&copy; 2025 Portell Winery"));
    }

    #[test]
    fn test_booking_email_free_event_in_english() {
        let mut email = booking();
        email.total_price = Decimal::ZERO;
        let html = render_booking_confirmation(&email, Language::En).unwrap();
        assert!(html.contains("June 1, 2025"));
        assert!(html.contains("<strong>Free</strong>"));
        assert!(!html.contains("0.00 PLN"));
    }

    #[test]
    fn test_booking_email_escapes_free_text() {
        let mut email = booking();
        email.customer_name = "<script>alert(1)</script>".to_owned();
        email.special_requests = "Bez <b>glutenu</b>".to_owned();
        let html = render_booking_confirmation(&email, Language::Pl).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>glutenu</b>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = render_order_confirmation(&order(), Language::Pl).unwrap();
        let second = render_order_confirmation(&order(), Language::Pl).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_email_contains_lines_and_totals() {
        let html = render_order_confirmation(&order(), Language::Pl).unwrap();
        assert!(html.contains("PORTELL-1717000000000"));
        assert!(html.contains("Regent 2021"));
        assert!(html.contains("120.00 PLN"));
        assert!(html.contains("Bezpłatna"));
        assert!(html.contains("65-001 Zielona Góra"));
        assert!(html.contains("Przelew bankowy"));
    }

    #[test]
    fn test_subjects() {
        assert_eq!(
            booking_subject("Degustacja win", Language::Pl),
            "Potwierdzenie rezerwacji - Degustacja win"
        );
        assert_eq!(
            booking_subject("Wine tasting", Language::En),
            "Booking Confirmation - Wine tasting"
        );
        assert_eq!(
            order_subject("PORTELL-1", Language::Pl),
            "Potwierdzenie zamówienia PORTELL-1"
        );
        assert_eq!(
            order_subject("PORTELL-1", Language::En),
            "Order confirmation PORTELL-1"
        );
    }

    #[test]
    fn test_note_escapes_and_splits_paragraphs() {
        let html = render_note(
            "Kontakt",
            Some("Witaj <b>Anna</b>"),
            "Pierwszy akapit\n\nDrugi\nwiersz",
            Language::Pl,
            2025,
        )
        .unwrap();
        assert!(!html.contains("<b>Anna"));
        assert!(html.contains("Pierwszy akapit</p>"));
        assert!(html.contains("Drugi<br>wiersz"));
        assert!(html.contains("&copy; 2025"));
    }
}
