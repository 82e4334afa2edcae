//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET    /products             - List (?category=, ?featured=true) or fetch (?id=)
//! POST   /products             - Add a product
//! PUT    /products             - Shallow-merge fields into the product named by body `id`
//! DELETE /products?id=         - Remove a product
//!
//! # Cart (session-backed)
//! GET    /cart                 - Cart lines and order summary
//! POST   /cart/items           - Add to cart (merges with an existing line)
//! PATCH  /cart/items/{id}      - Set a line's quantity
//! DELETE /cart/items/{id}      - Remove a line
//!
//! # Checkout
//! POST /checkout               - Placeholder, reports the summary
//!
//! # Auth (proxied to the admin backend)
//! POST /auth/login             - Login action
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! GET  /auth/session           - Current session status
//!
//! # Dashboard (requires auth)
//! GET  /dashboard              - Admin figures and recent orders
//! ```

pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Create the cart line-item routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
}

/// Create the main routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(products::index)
                .post(products::create)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/cart", get(cart::show))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .nest("/auth", auth_routes())
        .route("/dashboard", get(dashboard::show))
}
