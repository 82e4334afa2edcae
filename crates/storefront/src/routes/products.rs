//! Product catalog route handlers.
//!
//! One collection resource, four verbs. `GET` lists or fetches by query,
//! `POST` creates, `PUT` shallow-merges by the body's `id`, `DELETE` removes
//! by `?id=`.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zafra_core::{NewProduct, PriceError, Product, ProductFilter, ProductId, ProductPatch};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for listing products.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub id: Option<String>,
    pub category: Option<String>,
    pub featured: Option<String>,
}

/// Query parameters for deleting a product.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// Body of an update: the target id plus the fields to overwrite.
#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub id: Option<ProductId>,
    #[serde(flatten)]
    pub patch: ProductPatch,
}

/// A product as the API returns it, with its discount worked out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i64>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            discount_percent: product.discount_percent(),
            product,
        }
    }
}

/// `GET /products` response: either one product or a list.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProductsResponse {
    One { product: ProductView },
    Many { products: Vec<ProductView> },
}

/// Response to a successful create or update.
#[derive(Debug, Serialize)]
pub struct ProductMutation {
    pub message: &'static str,
    pub product: ProductView,
}

/// Response to a successful delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List products, or fetch one by id.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductsResponse>> {
    let filter = ProductFilter::from_query(
        query.id.as_deref(),
        query.category.as_deref(),
        query.featured.as_deref(),
    );

    if let ProductFilter::Id(id) = &filter {
        let product = state.products().get(id).await?;
        return Ok(Json(ProductsResponse::One {
            product: product.into(),
        }));
    }

    let products = state.products().list(&filter).await?;
    Ok(Json(ProductsResponse::Many {
        products: products.into_iter().map(ProductView::from).collect(),
    }))
}

/// Add a product to the catalog.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<ProductMutation>> {
    let Json(new_product) = payload.map_err(|e| invalid_body("Failed to add product", &e))?;
    new_product.validate().map_err(out_of_range)?;

    let product = state.products().create(new_product).await?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product added");

    Ok(Json(ProductMutation {
        message: "Product added successfully",
        product: product.into(),
    }))
}

/// Shallow-merge fields into an existing product.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateProduct>, JsonRejection>,
) -> Result<Json<ProductMutation>> {
    let Json(UpdateProduct { id, patch }) =
        payload.map_err(|e| invalid_body("Failed to update product", &e))?;
    // A missing id is a malformed request here, not a lookup miss (404).
    let id = id
        .filter(|id| !id.as_str().is_empty())
        .ok_or_else(|| AppError::BadRequest("Product ID is required".to_string()))?;

    patch.validate().map_err(out_of_range)?;

    let product = state.products().replace(&id, patch).await?;
    tracing::info!(product_id = %product.id, "Product updated");

    Ok(Json(ProductMutation {
        message: "Product updated successfully",
        product: product.into(),
    }))
}

/// Remove a product from the catalog.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<MessageResponse>> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .map(ProductId::from)
        .ok_or_else(|| AppError::BadRequest("Product ID is required".to_string()))?;

    let removed = state.products().delete(&id).await?;
    tracing::info!(product_id = %removed.id, "Product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}

fn out_of_range(error: PriceError) -> AppError {
    tracing::warn!(field = error.field, "Rejected out-of-range price");
    AppError::BadRequest(error.to_string())
}

fn invalid_body(message: &str, rejection: &JsonRejection) -> AppError {
    tracing::warn!(error = %rejection, "{message}");
    AppError::InvalidBody {
        message: message.to_string(),
        detail: rejection.body_text(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_view_includes_discount() {
        let product = crate::catalog::seed::products().remove(0);
        let json = serde_json::to_value(ProductView::from(product)).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["originalPrice"], 120.0);
        assert_eq!(json["discountPercent"], 26);
    }

    #[test]
    fn test_update_body_splits_id_from_fields() {
        let body: UpdateProduct =
            serde_json::from_str(r#"{"id":"2","price":150,"notes":{"top":["Fig"]}}"#).unwrap();
        assert_eq!(body.id, Some(ProductId::from("2")));
        assert_eq!(body.patch.price, Some(rust_decimal::Decimal::from(150)));
        assert_eq!(body.patch.notes.unwrap().top, ["Fig"]);
        assert!(body.patch.name.is_none());
    }

    #[test]
    fn test_update_body_without_id() {
        let body: UpdateProduct = serde_json::from_str(r#"{"name":"Zafra Rose"}"#).unwrap();
        assert!(body.id.is_none());
    }
}
