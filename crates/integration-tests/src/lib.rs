//! End-to-end test harness for Portell.
//!
//! [`Portell`] runs the storefront and the admin in-process over one
//! in-memory gateway, the way production runs both binaries over one
//! database. [`Browser`] drives either app like a visitor would: it keeps
//! the session cookie between requests and reads the whole body.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests
//! cargo test -p portell-integration-tests
//!
//! # Smoke tests against running servers
//! cargo test -p portell-integration-tests -- --ignored
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::{NaiveDate, NaiveTime};
use portell_admin::config::AdminConfig;
use portell_admin::services::StaticCredentialAuthenticator;
use portell_admin::services::auth::hash_password;
use portell_core::models::{Event, Product};
use portell_core::{EventType, ProductCategory};
use portell_gateway::mailer::{Mailer, RecordingMailer};
use portell_gateway::{Gateway, MemoryStore};
use portell_storefront::config::StorefrontConfig;
use rust_decimal::Decimal;
use tower::ServiceExt;

/// Admin login used by [`Portell::admin_browser`].
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "winnica-portell-2024";

/// Both web apps over a shared in-memory gateway.
pub struct Portell {
    pub gateway: Gateway,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    storefront: Router,
    admin: Router,
}

impl Portell {
    /// Default local configuration (read-modify-write seat counting).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig::local())
    }

    /// Storefront with `CHECKOUT_ATOMIC_BOOKINGS=true` behavior.
    #[must_use]
    pub fn atomic() -> Self {
        Self::with_config(StorefrontConfig {
            atomic_bookings: true,
            ..StorefrontConfig::local()
        })
    }

    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let (gateway, store) = Gateway::in_memory();
        let mailer = Arc::new(RecordingMailer::new());

        let storefront_state = portell_storefront::state::AppState::new(
            config,
            gateway.clone(),
            Arc::clone(&mailer) as Arc<dyn Mailer>,
        );
        let storefront = portell_storefront::app(
            storefront_state,
            portell_storefront::middleware::session_layer(
                tower_sessions::MemoryStore::default(),
                false,
            ),
        );

        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        let admin_config = AdminConfig::local(ADMIN_USERNAME, &hash);
        let authenticator = Arc::new(StaticCredentialAuthenticator::new(&admin_config.credentials));
        let admin_state =
            portell_admin::state::AppState::new(admin_config, gateway.clone(), authenticator, None);
        let admin = portell_admin::app(
            admin_state,
            portell_admin::middleware::session_layer(
                tower_sessions::MemoryStore::default(),
                false,
            ),
        );

        Self {
            gateway,
            store,
            mailer,
            storefront,
            admin,
        }
    }

    /// A fresh visitor on the storefront.
    #[must_use]
    pub fn visitor(&self) -> Browser {
        Browser::new(self.storefront.clone())
    }

    /// A browser on the admin, not logged in.
    #[must_use]
    pub fn admin_browser(&self) -> Browser {
        Browser::new(self.admin.clone())
    }

    /// A browser on the admin that has logged in.
    pub async fn logged_in_admin(&self) -> Browser {
        let mut browser = self.admin_browser();
        let response = browser
            .post_form(
                "/login",
                &[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)],
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "admin login failed");
        browser
    }
}

impl Default for Portell {
    fn default() -> Self {
        Self::new()
    }
}

/// What a [`Browser`] got back.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Page {
    /// `Location` of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// The `HX-Trigger` event name, if any.
    #[must_use]
    pub fn hx_trigger(&self) -> Option<&str> {
        self.headers
            .get("HX-Trigger")
            .and_then(|value| value.to_str().ok())
    }
}

/// A client for one app that keeps its session cookie.
pub struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub async fn get(&mut self, uri: &str) -> Page {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Page {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode(fields)))
            .unwrap();
        self.send(request).await
    }

    /// Same as [`post_form`](Self::post_form) but sent the way htmx sends it.
    pub async fn htmx_post(&mut self, uri: &str, fields: &[(&str, &str)]) -> Page {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("HX-Request", "true")
            .body(Body::from(encode(fields)))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> Page {
        let response = self.app.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_owned());
        }
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Page {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

fn encode(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

/// A red wine priced `price` zloty.
#[must_use]
pub fn wine(name: &str, price: Decimal) -> Product {
    Product {
        name: name.to_owned(),
        name_en: String::new(),
        slug: String::new(),
        description: "Czerwone wytrawne".to_owned(),
        description_en: "Dry red".to_owned(),
        price,
        category: ProductCategory::Red,
        wine_type: "wytrawne".to_owned(),
        vintage: Some(2021),
        grape_variety: "Regent".to_owned(),
        image_url: String::new(),
        stock: 24,
        active: true,
        featured: false,
    }
}

/// A tasting with `capacity` seats at 150 zloty per guest.
#[must_use]
pub fn tasting(capacity: i64) -> Event {
    Event {
        title: "Degustacja win".to_owned(),
        title_en: "Wine tasting".to_owned(),
        slug: "degustacja-win".to_owned(),
        description: "Pięć win z naszej winnicy".to_owned(),
        description_en: "Five wines from our vineyard".to_owned(),
        date: NaiveDate::from_ymd_opt(2031, 6, 1).unwrap(),
        time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        duration: "2 hours".to_owned(),
        location: "Winnica Portell".to_owned(),
        address: "ul. Winna 1, Zielona Góra".to_owned(),
        price: Decimal::new(150, 0),
        capacity,
        booked_count: 0,
        image_url: String::new(),
        event_type: EventType::Tasting,
        active: true,
    }
}

/// Contact step fields for a product order shipped in Poland.
pub const ORDER_CONTACT: &[(&str, &str)] = &[
    ("action", "next"),
    ("name", "Anna Nowak"),
    ("email", "anna@example.com"),
    ("phone", "+48 600 100 200"),
    ("street", "ul. Winna 1"),
    ("postal_code", "65-001"),
    ("city", "Zielona Góra"),
    ("billing_same", "on"),
];

/// Contact step fields for an event booking.
pub const BOOKING_CONTACT: &[(&str, &str)] = &[
    ("action", "next"),
    ("name", "Jan Kowalski"),
    ("email", "jan@example.com"),
    ("phone", "+48 600 300 400"),
];

/// Payment step choosing bank transfer (no card fields needed).
pub const PAY_BY_TRANSFER: &[(&str, &str)] = &[("action", "next"), ("payment_method", "transfer")];

/// Review step with consent given.
pub const CONFIRM: &[(&str, &str)] = &[("action", "next"), ("consent", "on")];

/// Walk an already started wizard through its three steps.
///
/// Returns the response to the final submit.
pub async fn complete_checkout(browser: &mut Browser, contact: &[(&str, &str)]) -> Page {
    for fields in [contact, PAY_BY_TRANSFER] {
        let page = browser.post_form("/checkout", fields).await;
        assert_eq!(page.status, StatusCode::SEE_OTHER, "{}", page.body);
    }
    browser.post_form("/checkout", CONFIRM).await
}

/// Fill the booking form on an event page.
pub async fn book(browser: &mut Browser, event_id: &str, guests: &str) -> Page {
    browser
        .post_form(
            &format!("/events/{event_id}/book"),
            &[
                ("customer_name", "Jan Kowalski"),
                ("customer_email", "jan@example.com"),
                ("customer_phone", "+48 600 300 400"),
                ("guests", guests),
                ("gdpr_consent", "on"),
            ],
        )
        .await
}
