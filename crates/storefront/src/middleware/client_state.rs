//! Typed access to per-visitor state kept in the session.
//!
//! Handlers never read session keys themselves: they take a [`ClientState`]
//! and call its methods. Mutations return a [`ClientEvent`] that the handler
//! puts in its response, where it becomes an `HX-Trigger` header so other
//! parts of the page (the cart badge, the language toggle) can refresh.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, request::Parts},
    response::{IntoResponseParts, ResponseParts},
};
use portell_core::cart::Cart;
use portell_core::checkout::CheckoutWizard;
use portell_core::recommend::ViewedEvents;
use portell_core::reservation::EventReservation;
use portell_core::{EventId, Language};
use serde::de::DeserializeOwned;
use tower_sessions::Session;

use crate::error::AppError;
use crate::services::Confirmation;

/// Session keys for visitor state.
pub mod session_keys {
    pub const CART: &str = "portell_cart";
    pub const LANGUAGE: &str = "portell_lang";
    pub const VIEWED_EVENTS: &str = "portell_viewed_events";
    /// Event reservation waiting to be checked out.
    pub const CHECKOUT_ITEM: &str = "portell_checkout_item";
    pub const CHECKOUT: &str = "portell_checkout";
    pub const LAST_CONFIRMATION: &str = "portell_last_confirmation";
    /// One-shot message shown on the next rendered page.
    pub const FLASH: &str = "portell_flash";
}

/// Response header HTMX reads client-side events from.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// A change other page fragments may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    CartUpdated,
    LanguageChanged,
}

impl ClientEvent {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CartUpdated => "cart-updated",
            Self::LanguageChanged => "language-changed",
        }
    }
}

impl IntoResponseParts for ClientEvent {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut()
            .append(HX_TRIGGER, HeaderValue::from_static(self.name()));
        Ok(res)
    }
}

/// The visitor's session state.
#[derive(Clone)]
pub struct ClientState {
    session: Session,
    language: Language,
}

impl<S> FromRequestParts<S> for ClientState
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_owned()))?;

        let language = read_or_default::<Language>(&session, session_keys::LANGUAGE).await;

        Ok(Self { session, language })
    }
}

impl ClientState {
    /// Display language, Polish until the visitor switches.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Store the language preference.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn set_language(&mut self, lang: Language) -> Result<ClientEvent, AppError> {
        self.session.insert(session_keys::LANGUAGE, lang).await?;
        self.language = lang;
        Ok(ClientEvent::LanguageChanged)
    }

    /// The cart, empty when none is stored or the stored one is unreadable.
    pub async fn cart(&self) -> Cart {
        read_or_default(&self.session, session_keys::CART).await
    }

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn save_cart(&self, cart: &Cart) -> Result<ClientEvent, AppError> {
        self.session.insert(session_keys::CART, cart).await?;
        Ok(ClientEvent::CartUpdated)
    }

    /// Load, change and store the cart in one go.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn update_cart<F>(&self, change: F) -> Result<ClientEvent, AppError>
    where
        F: FnOnce(&mut Cart) + Send,
    {
        let mut cart = self.cart().await;
        change(&mut cart);
        self.save_cart(&cart).await
    }

    pub async fn viewed_events(&self) -> ViewedEvents {
        read_or_default(&self.session, session_keys::VIEWED_EVENTS).await
    }

    /// Remember that the visitor opened an event page.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn record_view(&self, id: EventId) -> Result<ViewedEvents, AppError> {
        let mut viewed = self.viewed_events().await;
        viewed.record(id);
        self.session
            .insert(session_keys::VIEWED_EVENTS, &viewed)
            .await?;
        Ok(viewed)
    }

    /// Hand a validated reservation over to checkout.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn set_checkout_item(&self, reservation: &EventReservation) -> Result<(), AppError> {
        self.session
            .insert(session_keys::CHECKOUT_ITEM, reservation)
            .await?;
        Ok(())
    }

    pub async fn checkout_item(&self) -> Option<EventReservation> {
        read_optional(&self.session, session_keys::CHECKOUT_ITEM).await
    }

    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn clear_checkout_item(&self) -> Result<(), AppError> {
        self.session
            .remove_value(session_keys::CHECKOUT_ITEM)
            .await?;
        Ok(())
    }

    pub async fn checkout(&self) -> Option<CheckoutWizard> {
        read_optional(&self.session, session_keys::CHECKOUT).await
    }

    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn save_checkout(&self, wizard: &CheckoutWizard) -> Result<(), AppError> {
        self.session.insert(session_keys::CHECKOUT, wizard).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn clear_checkout(&self) -> Result<(), AppError> {
        self.session
            .remove_value(session_keys::CHECKOUT)
            .await?;
        Ok(())
    }

    pub async fn last_confirmation(&self) -> Option<Confirmation> {
        read_optional(&self.session, session_keys::LAST_CONFIRMATION).await
    }

    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn set_last_confirmation(&self, confirmation: &Confirmation) -> Result<(), AppError> {
        self.session
            .insert(session_keys::LAST_CONFIRMATION, confirmation)
            .await?;
        Ok(())
    }

    /// Queue a toast for the next page render.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be written.
    pub async fn flash(&self, message: &str) -> Result<(), AppError> {
        self.session.insert(session_keys::FLASH, message).await?;
        Ok(())
    }

    /// Take the queued toast, if any.
    pub async fn take_flash(&self) -> Option<String> {
        match self.session.remove::<String>(session_keys::FLASH).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable flash message");
                None
            }
        }
    }
}

async fn read_optional<T: DeserializeOwned>(session: &Session, key: &str) -> Option<T> {
    match session.get::<T>(key).await {
        Ok(value) => value,
        Err(e) => {
            // Stale shape from an older release; start over.
            tracing::warn!(key, error = %e, "Discarding unreadable session value");
            None
        }
    }
}

async fn read_or_default<T: DeserializeOwned + Default>(session: &Session, key: &str) -> T {
    read_optional(session, key).await.unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use portell_core::models::Product;
    use portell_core::{ProductCategory, ProductId};
    use rust_decimal::Decimal;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn regent() -> Product {
        Product {
            name: "Regent 2021".to_owned(),
            name_en: String::new(),
            slug: "regent-2021".to_owned(),
            description: String::new(),
            description_en: String::new(),
            price: Decimal::new(60, 0),
            category: ProductCategory::Red,
            wine_type: "wytrawne".to_owned(),
            vintage: Some(2021),
            grape_variety: "Regent".to_owned(),
            image_url: String::new(),
            stock: 12,
            active: true,
            featured: false,
        }
    }

    #[tokio::test]
    async fn test_language_defaults_to_polish_and_persists() {
        let session = session();
        let mut state = ClientState {
            session: session.clone(),
            language: read_or_default(&session, session_keys::LANGUAGE).await,
        };
        assert_eq!(state.language(), Language::Pl);

        let event = state.set_language(Language::En).await.unwrap();
        assert_eq!(event, ClientEvent::LanguageChanged);

        let stored: Language = session.get(session_keys::LANGUAGE).await.unwrap().unwrap();
        assert_eq!(stored, Language::En);
    }

    #[tokio::test]
    async fn test_cart_roundtrip_emits_cart_updated() {
        let state = ClientState {
            session: session(),
            language: Language::Pl,
        };
        let id = ProductId::new();
        let product = regent();

        let event = state
            .update_cart(|cart| cart.add(id, &product, Language::Pl, 1))
            .await
            .unwrap();
        assert_eq!(event, ClientEvent::CartUpdated);
        state
            .update_cart(|cart| cart.add(id, &product, Language::Pl, 2))
            .await
            .unwrap();

        let cart = state.cart().await;
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[tokio::test]
    async fn test_unreadable_value_reads_as_default() {
        let session = session();
        session
            .insert(session_keys::CART, "not a cart")
            .await
            .unwrap();
        let state = ClientState {
            session,
            language: Language::Pl,
        };
        assert!(state.cart().await.is_empty());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ClientEvent::CartUpdated.name(), "cart-updated");
        assert_eq!(ClientEvent::LanguageChanged.name(), "language-changed");
    }
}
