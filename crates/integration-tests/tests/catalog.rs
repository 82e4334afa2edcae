//! Integration tests for the product catalog endpoints.
//!
//! The admin backend is never called here, so the storefront points at an
//! unreachable URL.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use zafra_integration_tests::{TestClient, storefront, unreachable_admin_url};

fn client() -> TestClient {
    TestClient::new(storefront(unreachable_admin_url()))
}

fn new_product() -> serde_json::Value {
    json!({
        "name": "Zafra Amber Night",
        "price": 130,
        "originalPrice": 160,
        "description": "Warm amber for evenings",
        "category": "Oriental",
        "size": "100ml",
    })
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_health() {
    let resp = client().get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn test_list_all_products() {
    let resp = client().get("/products").await;
    assert_eq!(resp.status, StatusCode::OK);

    let products = resp.body["products"].as_array().unwrap();
    assert_eq!(products.len(), 6);
    assert_eq!(products[0]["id"], "1");
    assert_eq!(products[0]["name"], "Zafra Classic");
    assert_eq!(products[0]["discountPercent"], 26);
}

#[tokio::test]
async fn test_get_single_product() {
    let resp = client().get("/products?id=3").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["product"]["id"], "3");
    assert!(resp.body.get("products").is_none());
}

#[tokio::test]
async fn test_get_unknown_product_is_404() {
    let resp = client().get("/products?id=999").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["error"], "Product not found");
}

#[tokio::test]
async fn test_featured_is_first_three() {
    let resp = client().get("/products?featured=true").await;
    let ids: Vec<_> = resp.body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[tokio::test]
async fn test_category_filter_ignores_case() {
    let mut client = client();
    let lower = client.get("/products?category=luxury").await;
    let upper = client.get("/products?category=LUXURY").await;
    assert_eq!(lower.body, upper.body);
    assert_eq!(lower.body["products"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Mutation
// =============================================================================

#[tokio::test]
async fn test_create_assigns_next_id() {
    let mut client = client();
    let resp = client.post("/products", new_product()).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Product added successfully");
    assert_eq!(resp.body["product"]["id"], "7");
    assert_eq!(resp.body["product"]["availability"], "In Stock");
    assert_eq!(resp.body["product"]["rating"], 0.0);

    let listed = client.get("/products").await;
    assert_eq!(listed.body["products"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_create_with_malformed_body_is_400() {
    let resp = client()
        .send_raw(Method::POST, "/products", "{not json")
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Failed to add product");
    assert!(resp.body["detail"].is_string());
}

#[tokio::test]
async fn test_update_shallow_merges() {
    let mut client = client();
    let resp = client
        .put("/products", json!({ "id": "2", "price": 150 }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Product updated successfully");
    assert_eq!(resp.body["product"]["price"], 150.0);
    assert_eq!(resp.body["product"]["name"], "Zafra Premium");

    let fetched = client.get("/products?id=2").await;
    assert_eq!(fetched.body["product"]["price"], 150.0);
}

#[tokio::test]
async fn test_update_without_id_is_400() {
    let resp = client().put("/products", json!({ "price": 1 })).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Product ID is required");
}

#[tokio::test]
async fn test_out_of_range_prices_are_rejected() {
    let mut client = client();

    let resp = client
        .put(
            "/products",
            json!({ "id": "1", "price": 1e20, "originalPrice": 1e-20 }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "price must be between 0 and 1000000");

    let mut huge = new_product();
    huge["price"] = json!(1e28);
    let resp = client.post("/products", huge).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let mut negative = new_product();
    negative["originalPrice"] = json!(-5);
    let resp = client.post("/products", negative).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    // Nothing reached the catalog; listing still works.
    let listed = client.get("/products").await;
    assert_eq!(listed.status, StatusCode::OK);
    let products = listed.body["products"].as_array().unwrap();
    assert_eq!(products.len(), 6);
    assert_eq!(products[0]["price"], 89.0);
}

#[tokio::test]
async fn test_extreme_in_range_discount_still_lists() {
    let mut client = client();
    let resp = client
        .put(
            "/products",
            json!({ "id": "1", "price": 1_000_000, "originalPrice": 1e-20 }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["product"].get("discountPercent").is_none());

    let listed = client.get("/products").await;
    assert_eq!(listed.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_unknown_is_404() {
    let resp = client()
        .put("/products", json!({ "id": "999", "price": 1 }))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product() {
    let mut client = client();
    let resp = client.delete("/products?id=4").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Product deleted successfully");

    let gone = client.get("/products?id=4").await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_leaves_catalog_unchanged() {
    let mut client = client();
    let resp = client.delete("/products?id=999").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let listed = client.get("/products").await;
    assert_eq!(listed.body["products"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_delete_without_id_is_400() {
    let resp = client().delete("/products").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Product ID is required");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let resp = client().get("/health").await;
    assert!(resp.headers.contains_key("x-request-id"));
}
