//! Product catalog storage.
//!
//! Handlers never touch the product collection directly; they go through a
//! [`ProductRepository`] held in [`AppState`](crate::state::AppState). The
//! only backend is [`InMemoryProductRepository`], which starts from the
//! seed catalog and forgets every change on restart.

mod memory;
pub mod seed;

use async_trait::async_trait;
use thiserror::Error;
use zafra_core::{NewProduct, Product, ProductFilter, ProductId, ProductPatch};

pub use memory::InMemoryProductRepository;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No product has this id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The storage backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Storage for catalog products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products matching `filter`, in catalog order.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;

    /// A single product.
    async fn get(&self, id: &ProductId) -> Result<Product, RepositoryError>;

    /// Insert a new product under the next free numeric id.
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Shallow-merge `patch` into the stored product.
    async fn replace(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, RepositoryError>;

    /// Remove a product, returning what was removed.
    async fn delete(&self, id: &ProductId) -> Result<Product, RepositoryError>;
}
