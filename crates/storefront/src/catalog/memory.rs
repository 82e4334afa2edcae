//! In-memory catalog backend.

use async_trait::async_trait;
use tokio::sync::RwLock;
use zafra_core::{NewProduct, Product, ProductFilter, ProductId, ProductPatch};

use super::{ProductRepository, RepositoryError, seed};

/// Catalog held in process memory behind a read-write lock.
///
/// Id assignment and insertion happen under a single write guard, so
/// concurrent creates always get distinct ids.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    /// A repository holding exactly `products`, in order.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// A repository holding the six Zafra fragrances.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed::products())
    }

    /// Number of products currently stored.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    /// Whether the catalog is empty.
    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(filter.apply(&products).into_iter().cloned().collect())
    }

    async fn get(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut products = self.products.write().await;
        let id = ProductId::next_after(products.iter().map(|p| &p.id));
        let product = product.into_product(id);
        products.push(product.clone());
        Ok(product)
    }

    async fn replace(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, RepositoryError> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        product.apply(patch);
        Ok(product.clone())
    }

    async fn delete(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        Ok(products.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;

    fn new_product(name: &str) -> NewProduct {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "price": 99,
            "originalPrice": 129,
            "category": "Floral",
            "rating": 4.2,
            "availability": "Sold Out",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_seeded_catalog() {
        let repo = InMemoryProductRepository::seeded();
        assert_eq!(repo.len().await, 6);
        let classic = repo.get(&ProductId::from("1")).await.unwrap();
        assert_eq!(classic.name, "Zafra Classic");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let repo = InMemoryProductRepository::seeded();

        let featured = repo.list(&ProductFilter::Featured).await.unwrap();
        let ids: Vec<_> = featured.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);

        let luxury = repo
            .list(&ProductFilter::Category("LUXURY".to_string()))
            .await
            .unwrap();
        assert_eq!(luxury.len(), 1);
        assert_eq!(luxury[0].name, "Zafra Luxury");

        let none = repo
            .list(&ProductFilter::Category("Citrus".to_string()))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_next_id_and_defaults() {
        let repo = InMemoryProductRepository::seeded();
        let created = repo.create(new_product("Zafra Bloom")).await.unwrap();

        assert_eq!(created.id.as_str(), "7");
        assert!(created.rating.abs() < f64::EPSILON);
        assert_eq!(created.reviews, 0);
        assert_eq!(created.availability, "In Stock");
        assert_eq!(created.price, Decimal::from(99));
        assert_eq!(repo.len().await, 7);
    }

    #[tokio::test]
    async fn test_create_in_empty_catalog() {
        let repo = InMemoryProductRepository::default();
        assert!(repo.is_empty().await);
        let created = repo.create(new_product("First")).await.unwrap();
        assert_eq!(created.id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let repo = Arc::new(InMemoryProductRepository::seeded());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create(new_product(&format!("P{i}"))).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_by_key(|id| id.numeric());
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(repo.len().await, 22);
    }

    #[tokio::test]
    async fn test_replace_merges_fields() {
        let repo = InMemoryProductRepository::seeded();
        let patch: ProductPatch =
            serde_json::from_value(serde_json::json!({"price": 79, "availability": "Low Stock"}))
                .unwrap();
        let updated = repo.replace(&ProductId::from("1"), patch).await.unwrap();

        assert_eq!(updated.price, Decimal::from(79));
        assert_eq!(updated.availability, "Low Stock");
        assert_eq!(updated.name, "Zafra Classic");
        assert_eq!(repo.get(&ProductId::from("1")).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let repo = InMemoryProductRepository::seeded();
        let missing = ProductId::from("42");

        assert!(matches!(repo.get(&missing).await, Err(RepositoryError::NotFound(_))));
        assert!(matches!(
            repo.replace(&missing, ProductPatch::default()).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(repo.delete(&missing).await, Err(RepositoryError::NotFound(_))));
        assert_eq!(repo.len().await, 6);
    }

    #[tokio::test]
    async fn test_delete_removes_product() {
        let repo = InMemoryProductRepository::seeded();
        let removed = repo.delete(&ProductId::from("6")).await.unwrap();
        assert_eq!(removed.name, "Zafra Noir");
        assert_eq!(repo.len().await, 5);
        assert!(repo.get(&ProductId::from("6")).await.is_err());
    }
}
