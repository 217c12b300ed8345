//! Cart route handlers.
//!
//! The cart lives in the session. Every change answers with a
//! `cart-updated` trigger so the header badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use portell_core::cart::{Cart, CartLine};
use portell_core::{ProductId, format_pln};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::i18n::Labels;
use crate::middleware::ClientState;
use crate::routes::is_htmx;
use crate::state::AppState;
use crate::views::Chrome;

/// Cart line display data for templates.
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            quantity: line.quantity,
            price: format_pln(line.price),
            line_total: format_pln(line.line_total()),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: Chrome,
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

impl CartShowTemplate {
    fn new(chrome: Chrome, cart: &Cart) -> Self {
        Self {
            chrome,
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal: format_pln(cart.subtotal()),
        }
    }
}

/// Display the cart page.
#[instrument(skip(client))]
pub async fn show(client: ClientState) -> CartShowTemplate {
    let cart = client.cart().await;
    CartShowTemplate::new(Chrome::load(&client).await, &cart)
}

/// Add a product to the cart.
///
/// HTMX requests get the updated badge back; plain form posts go to the cart.
///
/// # Errors
///
/// Returns 404 for unknown or inactive products.
#[instrument(skip(state, client, headers))]
pub async fn add(
    State(state): State<AppState>,
    client: ClientState,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let lang = client.language();
    let product = state
        .gateway()
        .products
        .find_optional(form.product_id)
        .await?
        .filter(|record| record.active)
        .ok_or_else(|| AppError::not_found("/shop"))?;

    let quantity = form.quantity.unwrap_or(1);
    let event = client
        .update_cart(|cart| cart.add(product.id, &product, lang, quantity))
        .await?;
    tracing::info!(product_id = %product.id, quantity, "Added to cart");

    if is_htmx(&headers) {
        let count = client.cart().await.item_count();
        return Ok((event, CartCountTemplate { count }).into_response());
    }

    client.flash(Labels::for_lang(lang).added_to_cart).await?;
    Ok((event, Redirect::to("/cart")).into_response())
}

/// Change a line's quantity. Quantities below one are ignored.
#[instrument(skip(client))]
pub async fn update(client: ClientState, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let event = client
        .update_cart(|cart| cart.update_quantity(form.product_id, form.quantity))
        .await?;
    Ok((event, Redirect::to("/cart")).into_response())
}

/// Remove a line from the cart.
#[instrument(skip(client))]
pub async fn remove(
    client: ClientState,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let event = client
        .update_cart(|cart| cart.remove(form.product_id))
        .await?;
    Ok((event, Redirect::to("/cart")).into_response())
}

/// Empty the cart.
#[instrument(skip(client))]
pub async fn clear(client: ClientState) -> Result<Response> {
    let event = client.update_cart(Cart::clear).await?;
    Ok((event, Redirect::to("/cart")).into_response())
}

/// Cart count badge (HTMX fragment).
#[instrument(skip(client))]
pub async fn count(client: ClientState) -> CartCountTemplate {
    CartCountTemplate {
        count: client.cart().await.item_count(),
    }
}
