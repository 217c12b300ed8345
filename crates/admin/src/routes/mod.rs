//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Dashboard
//! GET  /                       - Counts, revenue, recent bookings and orders
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Check credentials
//! POST /logout                 - Logout
//!
//! # Products
//! GET  /products               - Product listing
//! POST /products               - Create product
//! GET  /products/new           - New product editor
//! GET  /products/{id}/edit     - Edit product
//! POST /products/{id}          - Save product
//! POST /products/{id}/delete   - Delete product
//!
//! # Events
//! GET  /events                 - Event listing
//! POST /events                 - Create event
//! GET  /events/new             - New event editor
//! GET  /events/{id}/edit       - Edit event
//! POST /events/{id}            - Save event
//! POST /events/{id}/delete     - Delete event
//!
//! # Uploads
//! POST /uploads                - Store an image, answer with its URL
//! ```

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod forms;
pub mod products;
pub mod uploads;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl SelectOption {
    fn new(value: &'static str, label: &'static str, current: &str) -> Self {
        Self {
            value,
            label,
            selected: value == current.trim(),
        }
    }
}

/// Multipart framing on top of the image itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/products", get(products::index).post(products::create))
        .route("/products/new", get(products::new_form))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit_form))
        .route("/products/{id}/delete", post(products::delete))
        .route("/events", get(events::index).post(events::create))
        .route("/events/new", get(events::new_form))
        .route("/events/{id}", post(events::update))
        .route("/events/{id}/edit", get(events::edit_form))
        .route("/events/{id}/delete", post(events::delete))
        .route(
            "/uploads",
            post(uploads::upload).layer(DefaultBodyLimit::max(
                uploads::MAX_UPLOAD_BYTES + UPLOAD_OVERHEAD_BYTES,
            )),
        )
}
