//! Cart quotes against the seed catalog.
//!
//! # Usage
//!
//! ```bash
//! # Two of product 1, one of product 4
//! zafra cart quote 1:2 4
//! ```
//!
//! Shipping and tax follow the same `ZAFRA_*` pricing variables as the
//! storefront.

use serde::Serialize;
use thiserror::Error;
use zafra_core::{Cart, CartItem, OrderSummary, ProductId, format_usd};
use zafra_storefront::catalog::seed;
use zafra_storefront::config::StorefrontConfig;

use super::emit;

/// Errors that can occur while building a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// An `ID[:QTY]` argument did not parse.
    #[error("Invalid item '{0}': expected ID or ID:QTY with QTY >= 1")]
    InvalidItem(String),

    /// The id is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),
}

#[derive(Debug, Serialize)]
struct Quote {
    items: Vec<CartItem>,
    summary: OrderSummary,
}

/// Build a cart from `items` and print its order summary.
///
/// # Errors
///
/// Returns an error if an item is malformed or unknown, or if the pricing
/// configuration cannot be read.
pub fn quote(items: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let pricing = StorefrontConfig::from_env()?.pricing;
    let cart = build_cart(items)?;
    let summary = cart.totals_with(&pricing);
    tracing::info!(
        items = summary.item_count,
        subtotal = %format_usd(summary.subtotal),
        total = %format_usd(summary.total),
        "Quote"
    );
    emit(&Quote {
        items: cart.items().to_vec(),
        summary,
    })?;
    Ok(())
}

fn build_cart(items: &[String]) -> Result<Cart, QuoteError> {
    let products = seed::products();
    let mut cart = Cart::new();

    for item in items {
        let (id, quantity) = parse_item(item)?;
        let product = products
            .iter()
            .find(|p| p.id == id)
            .ok_or(QuoteError::UnknownProduct(id))?;
        cart.add(product, quantity);
    }

    Ok(cart)
}

/// Parse `ID` or `ID:QTY`.
fn parse_item(item: &str) -> Result<(ProductId, u32), QuoteError> {
    let invalid = || QuoteError::InvalidItem(item.to_owned());

    let (id, quantity) = match item.split_once(':') {
        Some((id, qty)) => (id, qty.parse::<u32>().map_err(|_| invalid())?),
        None => (item, 1),
    };
    if id.is_empty() || quantity == 0 {
        return Err(invalid());
    }

    Ok((ProductId::from(id), quantity))
}
