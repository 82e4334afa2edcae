//! Shopping cart and order-summary derivation.
//!
//! The cart is an ordered list of line items, one per product id. Totals
//! are never stored; [`Cart::totals`] recomputes them from the lines on every
//! call using exact decimal arithmetic, so `total == subtotal + shipping +
//! tax` holds to the last digit. Arithmetic saturates instead of panicking;
//! catalog prices are bounded by [`MAX_PRICE`](crate::MAX_PRICE), so real
//! carts never reach the limit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{ProductId, discount_percent};

/// Shipping and tax rules applied to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Subtotals strictly above this amount ship free.
    #[serde(with = "rust_decimal::serde::float")]
    pub free_shipping_over: Decimal,
    /// Shipping charged at or below the threshold.
    #[serde(with = "rust_decimal::serde::float")]
    pub flat_shipping: Decimal,
    /// Sales tax as a fraction of the subtotal (0.08 = 8%).
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_over: Decimal::from(75),
            flat_shipping: Decimal::from(10),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

impl PricingPolicy {
    /// Shipping charged for a given subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_shipping_over {
            Decimal::ZERO
        } else {
            self.flat_shipping
        }
    }

    /// How much more must be spent before shipping is free, or `None` once
    /// the subtotal has reached the threshold.
    #[must_use]
    pub fn free_shipping_remaining(&self, subtotal: Decimal) -> Option<Decimal> {
        (subtotal < self.free_shipping_over)
            .then(|| self.free_shipping_over.saturating_sub(subtotal))
    }
}

/// A line in the cart: a snapshot of the product taken when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    pub image: String,
    pub description: String,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Snapshot `product` with the given quantity.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            original_price: product.original_price,
            image: product.image.clone(),
            description: product.description.clone(),
            quantity,
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Amount saved on this line against the original price.
    #[must_use]
    pub fn line_savings(&self) -> Decimal {
        self.original_price
            .saturating_sub(self.price)
            .saturating_mul(Decimal::from(self.quantity))
    }

    /// Discount of this line's unit price, in whole percent.
    #[must_use]
    pub fn discount_percent(&self) -> Option<i64> {
        discount_percent(self.price, self.original_price)
    }
}

/// Derived totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub item_count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub savings: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Spend still needed for free shipping; absent once it applies.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub free_shipping_remaining: Option<Decimal>,
}

/// A visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Add `quantity` of `product`.
    ///
    /// If the product is already in the cart its quantity grows; otherwise a
    /// new line is appended. Adding zero is a no-op.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem::from_product(product, quantity)),
        }
    }

    /// Set a line's quantity.
    ///
    /// Quantities below 1 are ignored and the line keeps its prior value;
    /// use [`Cart::remove`] to drop a line. Returns whether a line changed.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Totals under the default pricing policy.
    #[must_use]
    pub fn totals(&self) -> OrderSummary {
        self.totals_with(&PricingPolicy::default())
    }

    /// Totals under an explicit pricing policy.
    #[must_use]
    pub fn totals_with(&self, policy: &PricingPolicy) -> OrderSummary {
        let subtotal = self
            .items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()));
        let savings = self
            .items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_savings()));
        let item_count = self
            .items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity));
        let shipping = policy.shipping_for(subtotal);
        let tax = subtotal.saturating_mul(policy.tax_rate);

        OrderSummary {
            item_count,
            subtotal,
            savings,
            shipping,
            tax,
            total: subtotal.saturating_add(shipping).saturating_add(tax),
            free_shipping_remaining: policy.free_shipping_remaining(subtotal),
        }
    }
}
