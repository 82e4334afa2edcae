//! Catalog listing.

use zafra_core::{Product, ProductFilter};
use zafra_storefront::catalog::seed;

use super::emit;

/// Print the seed catalog, filtered like `GET /products`.
///
/// # Errors
///
/// Returns an error if the output cannot be serialized.
pub fn list(category: Option<&str>, featured: bool) -> Result<(), Box<dyn std::error::Error>> {
    let products = seed::products();
    let selected = select(&products, category, featured);
    tracing::debug!(count = selected.len(), "Listing products");
    emit(&selected)?;
    Ok(())
}

fn select<'a>(products: &'a [Product], category: Option<&str>, featured: bool) -> Vec<&'a Product> {
    let filter = ProductFilter::from_query(None, category, featured.then_some("true"));
    filter.apply(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_featured() {
        let products = seed::products();
        let ids: Vec<_> = select(&products, None, true)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_select_category_ignores_case() {
        let products = seed::products();
        let matched = select(&products, Some("LUXURY"), false);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.first().map(|p| p.category.as_str()), Some("Luxury"));
    }

    #[test]
    fn test_select_all() {
        let products = seed::products();
        assert_eq!(select(&products, None, false).len(), products.len());
    }
}
