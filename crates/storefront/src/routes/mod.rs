//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about                  - About the winery
//! GET  /privacy                - Privacy policy
//! GET  /terms                  - Terms of service
//!
//! # Wines
//! GET  /shop                   - Product listing (?category, ?sort)
//! GET  /shop/{id}              - Product detail
//!
//! # Events
//! GET  /events                 - Event listing (?type)
//! GET  /events/{id}            - Event detail and booking form
//! POST /events/{id}/book       - Validate booking, hand over to checkout
//! GET  /events/{id}/calendar.ics - Calendar file for an event
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (triggers cart-updated)
//! POST /cart/update            - Change quantity
//! POST /cart/remove            - Remove line
//! POST /cart/clear             - Empty cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Wizard (?type=product|event)
//! POST /checkout               - Wizard step submit (action=next|back)
//! GET  /checkout/confirmation  - Confirmation of the last checkout
//! GET  /checkout/confirmation/calendar.ics - Calendar file for the last booking
//!
//! # Other
//! GET  /search                 - Combined product and event search
//! GET  /contact                - Contact page
//! POST /contact                - Send contact message
//! POST /newsletter             - Newsletter signup
//! POST /language               - Switch language (triggers language-changed)
//! POST /api/send-email         - Email delivery endpoint (CORS)
//! ```

pub mod api;
pub mod calendar;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod events;
pub mod home;
pub mod language;
pub mod pages;
pub mod search;
pub mod shop;

use axum::{
    Router,
    http::HeaderMap,
    routing::{any, get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shop::index))
        .route("/{id}", get(shop::show))
}

/// Create the event routes router.
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(events::index))
        .route("/{id}", get(events::show))
        .route("/{id}/book", post(events::book))
        .route("/{id}/calendar.ics", get(calendar::event_ics))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/confirmation", get(checkout::confirmation))
        .route("/confirmation/calendar.ics", get(calendar::confirmation_ics))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/privacy", get(pages::privacy))
        .route("/terms", get(pages::terms))
        .nest("/shop", shop_routes())
        .nest("/events", event_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/search", get(search::index))
        .route("/contact", get(contact::show).post(contact::submit))
        .route("/newsletter", post(contact::newsletter))
        .route("/language", post(language::switch))
        .route("/api/send-email", any(api::email::send_email))
}

/// Request was made by htmx rather than a full page load.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("HX-Request").is_some_and(|v| v == "true")
}
