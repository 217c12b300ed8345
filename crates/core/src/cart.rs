//! Shopping cart kept in the visitor's session.
//!
//! A cart is a list of [`CartLine`]s. Each line is a snapshot of the product
//! taken when it was first added: later price or name changes in the catalog
//! do not touch lines already in a cart. The serialized form is a plain JSON
//! array, `[{"id", "name", "price", "image_url", "quantity"}]`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OrderItem, Product};
use crate::types::{Language, ProductId};

/// Most bottles of one product a single cart line can hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.id,
            product_name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` of a product, merging with an existing line for the
    /// same product id. The line name is the product name in `lang` at the
    /// time it is first added. Line quantities stop at [`MAX_LINE_QUANTITY`].
    pub fn add(&mut self, id: ProductId, product: &Product, lang: Language, quantity: u32) {
        let quantity = quantity.clamp(1, MAX_LINE_QUANTITY);
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = line.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
            return;
        }
        self.lines.push(CartLine {
            id,
            name: product.localized_name(lang).to_owned(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity,
        });
    }

    /// Set a line's quantity. Quantities below one are ignored; use
    /// [`Cart::remove`] to drop a line. Larger ones stop at
    /// [`MAX_LINE_QUANTITY`].
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity < 1 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity.min(MAX_LINE_QUANTITY);
        }
    }

    pub fn remove(&mut self, id: ProductId) {
        self.lines.retain(|line| line.id != id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of bottles, shown in the header badge.
    ///
    /// Saturates: a session cart is client-influenced and may hold lines
    /// written before the quantity cap.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.line_total()))
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ProductCategory;

    fn wine(name: &str, price: i64) -> Product {
        Product {
            name: name.to_owned(),
            name_en: format!("{name} (EN)"),
            slug: String::new(),
            description: String::new(),
            description_en: String::new(),
            price: Decimal::new(price, 0),
            category: ProductCategory::Red,
            wine_type: "dry".to_owned(),
            vintage: Some(2021),
            grape_variety: "Regent".to_owned(),
            image_url: "https://img/regent.jpg".to_owned(),
            stock: 12,
            active: true,
            featured: false,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let id = ProductId::new();
        let mut cart = Cart::new();
        cart.add(id, &wine("Regent", 60), Language::Pl, 1);
        cart.add(id, &wine("Regent", 60), Language::Pl, 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_snapshots_localized_name_and_price() {
        let id = ProductId::new();
        let mut cart = Cart::new();
        cart.add(id, &wine("Regent", 60), Language::En, 1);
        // a later price change does not reach the existing line
        cart.add(id, &wine("Regent", 99), Language::Pl, 1);

        let line = &cart.lines()[0];
        assert_eq!(line.name, "Regent (EN)");
        assert_eq!(line.price, Decimal::new(60, 0));
    }

    #[test]
    fn test_update_quantity_ignores_zero() {
        let id = ProductId::new();
        let mut cart = Cart::new();
        cart.add(id, &wine("Regent", 60), Language::Pl, 2);

        cart.update_quantity(id, 0);
        assert_eq!(cart.lines()[0].quantity, 2);

        cart.update_quantity(id, 5);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_remove_and_clear() {
        let (a, b) = (ProductId::new(), ProductId::new());
        let mut cart = Cart::new();
        cart.add(a, &wine("Regent", 60), Language::Pl, 1);
        cart.add(b, &wine("Solaris", 45), Language::Pl, 1);

        cart.remove(a);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].id, b);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantities_are_capped() {
        let id = ProductId::new();
        let mut cart = Cart::new();
        cart.add(id, &wine("Regent", 60), Language::Pl, u32::MAX);
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);

        cart.add(id, &wine("Regent", 60), Language::Pl, 5);
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);

        cart.update_quantity(id, u32::MAX);
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_item_count_saturates_on_oversized_lines() {
        let line = |quantity| CartLine {
            id: ProductId::new(),
            name: "Regent".to_owned(),
            price: Decimal::new(60, 0),
            image_url: String::new(),
            quantity,
        };
        let cart = Cart::from(vec![line(u32::MAX), line(1)]);
        assert_eq!(cart.item_count(), u32::MAX);
        assert!(cart.subtotal() > Decimal::ZERO);
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(), &wine("Regent", 60), Language::Pl, 2);
        cart.add(ProductId::new(), &wine("Solaris", 45), Language::Pl, 1);
        assert_eq!(cart.subtotal(), Decimal::new(165, 0));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(), &wine("Regent", 60), Language::Pl, 1);

        let json = serde_json::to_value(&cart).unwrap();
        let line = &json.as_array().unwrap()[0];
        assert_eq!(line["name"], "Regent");
        assert_eq!(line["quantity"], 1);
        assert!(line.get("image_url").is_some());

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
