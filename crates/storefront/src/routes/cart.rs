//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every response carries the full
//! cart and a freshly derived order summary, so clients never compute
//! totals themselves.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zafra_core::{Cart, CartItem, OrderSummary, PricingPolicy, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionContext;
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Update quantity request body.
///
/// Signed so that a client decrementing past zero gets the usual no-op
/// instead of a parse error.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i64,
}

/// Requested quantity as a cart quantity. Anything below 1 becomes 0, which
/// the cart ignores; anything past `u32::MAX` is capped.
fn cart_quantity(requested: i64) -> u32 {
    u32::try_from(requested.max(0)).unwrap_or(u32::MAX)
}

/// A cart line as the API returns it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i64>,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            line_total: item.line_total(),
            discount_percent: item.discount_percent(),
            item: item.clone(),
        }
    }
}

/// Cart response: lines, summary and an optional notice.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub summary: OrderSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl CartView {
    /// Render `cart` under `policy`.
    #[must_use]
    pub fn new(cart: &Cart, policy: &PricingPolicy) -> Self {
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            summary: cart.totals_with(policy),
            message: None,
        }
    }

    #[must_use]
    fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub summary: OrderSummary,
}

/// Display the cart.
#[instrument(skip(state, ctx))]
pub async fn show(State(state): State<AppState>, ctx: SessionContext) -> Json<CartView> {
    Json(CartView::new(ctx.cart(), state.pricing()))
}

/// Add a product to the cart, merging with an existing line.
#[instrument(skip(state, ctx, payload))]
pub async fn add(
    State(state): State<AppState>,
    mut ctx: SessionContext,
    payload: std::result::Result<Json<AddToCart>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(AddToCart {
        product_id,
        quantity,
    }) = payload.map_err(|e| AppError::InvalidBody {
        message: "Invalid cart item".to_string(),
        detail: e.body_text(),
    })?;

    let product = state.products().get(&product_id).await?;
    ctx.update_cart(|cart| cart.add(&product, cart_quantity(quantity)))
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );
    tracing::info!(product_id = %product_id, quantity, "Added to cart");

    Ok(Json(
        CartView::new(ctx.cart(), state.pricing()).with_message("Added to cart"),
    ))
}

/// Set a line's quantity. Quantities below 1 and unknown ids are ignored.
#[instrument(skip(state, ctx, payload))]
pub async fn update(
    State(state): State<AppState>,
    mut ctx: SessionContext,
    Path(product_id): Path<ProductId>,
    payload: std::result::Result<Json<UpdateQuantity>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(UpdateQuantity { quantity }) = payload.map_err(|e| AppError::InvalidBody {
        message: "Invalid quantity".to_string(),
        detail: e.body_text(),
    })?;

    let changed = ctx
        .update_cart(|cart| cart.set_quantity(&product_id, cart_quantity(quantity)))
        .await?;
    if !changed {
        tracing::debug!(product_id = %product_id, quantity, "Quantity change ignored");
    }

    Ok(Json(CartView::new(ctx.cart(), state.pricing())))
}

/// Remove a line from the cart.
#[instrument(skip(state, ctx))]
pub async fn remove(
    State(state): State<AppState>,
    mut ctx: SessionContext,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    ctx.update_cart(|cart| cart.remove(&product_id)).await?;
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(Json(
        CartView::new(ctx.cart(), state.pricing()).with_message("Item removed from cart"),
    ))
}

/// Checkout placeholder: reports the summary, takes no payment.
#[instrument(skip(state, ctx))]
pub async fn checkout(State(state): State<AppState>, ctx: SessionContext) -> Json<CheckoutResponse> {
    Json(CheckoutResponse {
        message: "Checkout functionality coming soon!",
        summary: ctx.cart().totals_with(state.pricing()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_body_defaults_quantity() {
        let body: AddToCart = serde_json::from_str(r#"{"productId":"3"}"#).unwrap();
        assert_eq!(body.product_id, ProductId::from("3"));
        assert_eq!(body.quantity, 1);
    }

    #[test]
    fn test_cart_quantity_clamps() {
        assert_eq!(cart_quantity(-1), 0);
        assert_eq!(cart_quantity(0), 0);
        assert_eq!(cart_quantity(3), 3);
        assert_eq!(cart_quantity(i64::MAX), u32::MAX);

        let body: UpdateQuantity = serde_json::from_str(r#"{"quantity":-1}"#).unwrap();
        assert_eq!(cart_quantity(body.quantity), 0);
    }

    #[test]
    fn test_cart_view_lines() {
        let products = crate::catalog::seed::products();
        let mut cart = Cart::new();
        cart.add(&products[0], 2);
        cart.add(&products[3], 1);

        let view = CartView::new(&cart, &PricingPolicy::default());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["items"][0]["id"], "1");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["lineTotal"], 178.0);
        assert_eq!(json["summary"]["subtotal"], 243.0);
        assert_eq!(json["summary"]["shipping"], 0.0);
        assert!(json.get("message").is_none());
        assert!(json["summary"].get("freeShippingRemaining").is_none());
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::new(&Cart::new(), &PricingPolicy::default())
            .with_message("Item removed from cart");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["summary"]["shipping"], 10.0);
        assert_eq!(json["message"], "Item removed from cart");
    }
}
