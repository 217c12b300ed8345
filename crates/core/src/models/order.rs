//! Wine orders placed through the cart checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Address, Contact};
use crate::types::{OrderStatus, PaymentMethod, PaymentStatus, ProductId};

/// Shipping is free for every order.
pub const SHIPPING_COST: Decimal = Decimal::ZERO;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order must contain at least one item")]
    NoItems,
    #[error("item {0} has zero quantity")]
    ZeroQuantity(String),
}

/// Snapshot of a cart line at the time the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub gdpr_consent: bool,
}

impl Order {
    /// Build a pending order from its lines, computing the money fields so
    /// that `total == subtotal + shipping_cost` always holds.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] when there are no items or an item has zero quantity.
    pub fn from_lines(
        order_number: String,
        contact: &Contact,
        shipping_address: Address,
        billing_address: Address,
        items: Vec<OrderItem>,
        payment_method: PaymentMethod,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        if let Some(item) = items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::ZeroQuantity(item.product_name.clone()));
        }

        let subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();
        Ok(Self {
            order_number,
            customer_name: contact.name.clone(),
            customer_email: contact.email.clone(),
            customer_phone: contact.phone.clone(),
            shipping_address,
            billing_address,
            items,
            subtotal,
            shipping_cost: SHIPPING_COST,
            total: subtotal + SHIPPING_COST,
            payment_method,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            gdpr_consent: true,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        Contact {
            name: "Anna Nowak".to_owned(),
            email: "anna@example.com".to_owned(),
            phone: "+48 600 100 200".to_owned(),
        }
    }

    fn item(name: &str, quantity: u32, price: i64) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(),
            product_name: name.to_owned(),
            quantity,
            price: Decimal::new(price, 0),
        }
    }

    #[test]
    fn test_from_lines_computes_totals() {
        let order = Order::from_lines(
            "PORTELL-1".to_owned(),
            &contact(),
            Address::default(),
            Address::default(),
            vec![item("Solaris", 2, 50), item("Regent", 1, 80)],
            PaymentMethod::Transfer,
        )
        .unwrap();

        assert_eq!(order.subtotal, Decimal::new(180, 0));
        assert_eq!(order.shipping_cost, Decimal::ZERO);
        assert_eq!(order.total, order.subtotal + order.shipping_cost);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_from_lines_rejects_empty() {
        let err = Order::from_lines(
            "PORTELL-1".to_owned(),
            &contact(),
            Address::default(),
            Address::default(),
            Vec::new(),
            PaymentMethod::Card,
        )
        .unwrap_err();
        assert_eq!(err, OrderError::NoItems);
    }

    #[test]
    fn test_from_lines_rejects_zero_quantity() {
        let err = Order::from_lines(
            "PORTELL-1".to_owned(),
            &contact(),
            Address::default(),
            Address::default(),
            vec![item("Solaris", 0, 50)],
            PaymentMethod::Card,
        )
        .unwrap_err();
        assert!(matches!(err, OrderError::ZeroQuantity(_)));
    }
}
