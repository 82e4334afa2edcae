//! Catalog product records.
//!
//! A [`Product`] is the full record the catalog stores. [`NewProduct`] is
//! what a create request carries (everything but the id), [`ProductPatch`]
//! is a shallow-merge update, and [`ProductFilter`] selects a subset for
//! listing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MAX_PRICE, ProductId, discount_percent, is_valid_price};

/// Number of products returned by the featured listing.
pub const FEATURED_COUNT: usize = 3;

/// Availability label given to newly created products.
pub const DEFAULT_AVAILABILITY: &str = "In Stock";

/// A price field outside the range the catalog stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be between 0 and {max}", max = MAX_PRICE)]
pub struct PriceError {
    /// Wire name of the offending field.
    pub field: &'static str,
}

fn check_price(field: &'static str, amount: Option<Decimal>) -> Result<(), PriceError> {
    match amount {
        Some(amount) if !is_valid_price(amount) => Err(PriceError { field }),
        _ => Ok(()),
    }
}

/// Fragrance notes, from first impression to dry-down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    #[serde(default)]
    pub top: Vec<String>,
    #[serde(default)]
    pub middle: Vec<String>,
    #[serde(default)]
    pub base: Vec<String>,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    pub rating: f64,
    pub reviews: u32,
    pub image: String,
    pub category: String,
    pub brand: String,
    pub size: String,
    /// Free-text stock status ("In Stock", "Limited Edition", ...).
    pub availability: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub notes: Notes,
}

impl Product {
    /// Discount against the original price, in whole percent.
    #[must_use]
    pub fn discount_percent(&self) -> Option<i64> {
        discount_percent(self.price, self.original_price)
    }

    /// Whether this product belongs to `category`, ignoring case.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Shallow-merge `patch` into this product.
    ///
    /// Every field present in the patch replaces the stored value; nested
    /// values such as `notes` are replaced wholesale, not merged.
    pub fn apply(&mut self, patch: ProductPatch) {
        let ProductPatch {
            name,
            price,
            original_price,
            description,
            long_description,
            rating,
            reviews,
            image,
            category,
            brand,
            size,
            availability,
            features,
            notes,
        } = patch;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = price {
            self.price = v;
        }
        if let Some(v) = original_price {
            self.original_price = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = long_description {
            self.long_description = v;
        }
        if let Some(v) = rating {
            self.rating = v;
        }
        if let Some(v) = reviews {
            self.reviews = v;
        }
        if let Some(v) = image {
            self.image = v;
        }
        if let Some(v) = category {
            self.category = v;
        }
        if let Some(v) = brand {
            self.brand = v;
        }
        if let Some(v) = size {
            self.size = v;
        }
        if let Some(v) = availability {
            self.availability = v;
        }
        if let Some(v) = features {
            self.features = v;
        }
        if let Some(v) = notes {
            self.notes = v;
        }
    }
}

/// Fields supplied when creating a product.
///
/// Rating, review count and availability are not accepted: new products
/// always start unrated, unreviewed and "In Stock". A missing original price
/// defaults to the selling price (no discount).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub notes: Notes,
}

impl NewProduct {
    /// Check that both prices are in range.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), PriceError> {
        check_price("price", Some(self.price))?;
        check_price("originalPrice", self.original_price)
    }

    /// Build the stored record under `id`.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            original_price: self.original_price.unwrap_or(self.price),
            name: self.name,
            price: self.price,
            description: self.description,
            long_description: self.long_description,
            rating: 0.0,
            reviews: 0,
            image: self.image,
            category: self.category,
            brand: self.brand,
            size: self.size,
            availability: DEFAULT_AVAILABILITY.to_owned(),
            features: self.features,
            notes: self.notes,
        }
    }
}

/// A shallow-merge update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub availability: Option<String>,
    pub features: Option<Vec<String>>,
    pub notes: Option<Notes>,
}

impl ProductPatch {
    /// Check that any prices the patch carries are in range.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), PriceError> {
        check_price("price", self.price)?;
        check_price("originalPrice", self.original_price)
    }
}

/// Which products a listing returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProductFilter {
    /// Every product, in catalog order.
    #[default]
    All,
    /// The product with exactly this id (zero or one result).
    Id(ProductId),
    /// Products whose category matches, ignoring case.
    Category(String),
    /// The first [`FEATURED_COUNT`] products in catalog order.
    Featured,
}

impl ProductFilter {
    /// Build a filter from raw query parameters.
    ///
    /// Empty values count as absent. When several are given, `id` wins over
    /// `category`, which wins over `featured`; `featured` only applies for
    /// the literal value `"true"`.
    #[must_use]
    pub fn from_query(id: Option<&str>, category: Option<&str>, featured: Option<&str>) -> Self {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }

        if let Some(id) = present(id) {
            Self::Id(ProductId::from(id))
        } else if let Some(category) = present(category) {
            Self::Category(category.to_owned())
        } else if featured == Some("true") {
            Self::Featured
        } else {
            Self::All
        }
    }

    /// Select matching products, preserving catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        match self {
            Self::All => products.iter().collect(),
            Self::Id(id) => products.iter().filter(|p| &p.id == id).collect(),
            Self::Category(category) => products.iter().filter(|p| p.in_category(category)).collect(),
            Self::Featured => products.iter().take(FEATURED_COUNT).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, category: &str) -> Product {
        NewProduct {
            name: format!("Zafra {id}"),
            price: Decimal::from(50),
            original_price: Some(Decimal::from(60)),
            description: String::new(),
            long_description: String::new(),
            image: String::new(),
            category: category.to_owned(),
            brand: "Zafra".to_owned(),
            size: "50ml".to_owned(),
            features: vec![],
            notes: Notes::default(),
        }
        .into_product(ProductId::from(id))
    }

    #[test]
    fn test_category_filter_ignores_case() {
        let products = vec![product("1", "Classic"), product("2", "Fresh"), product("3", "classic")];
        let upper = ProductFilter::Category("Classic".into()).apply(&products);
        let lower = ProductFilter::Category("classic".into()).apply(&products);
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);
    }

    #[test]
    fn test_featured_takes_first_three() {
        let products: Vec<_> = (1..=5).map(|i| product(&i.to_string(), "Classic")).collect();
        let featured = ProductFilter::Featured.apply(&products);
        let ids: Vec<_> = featured.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_from_query_precedence() {
        assert_eq!(
            ProductFilter::from_query(Some("2"), Some("Classic"), Some("true")),
            ProductFilter::Id(ProductId::from("2"))
        );
        assert_eq!(
            ProductFilter::from_query(None, Some("Classic"), Some("true")),
            ProductFilter::Category("Classic".into())
        );
        assert_eq!(ProductFilter::from_query(Some(""), None, Some("true")), ProductFilter::Featured);
        assert_eq!(ProductFilter::from_query(None, None, Some("yes")), ProductFilter::All);
    }

    #[test]
    fn test_new_product_defaults() {
        let new: NewProduct =
            serde_json::from_str(r#"{"name":"Zafra Ember","price":99.5,"category":"Warm"}"#).unwrap();
        let stored = new.into_product(ProductId::from("7"));
        assert_eq!(stored.original_price, Decimal::new(995, 1));
        assert_eq!(stored.availability, "In Stock");
        assert_eq!(stored.reviews, 0);
        assert!(stored.rating.abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_product_ignores_rating_and_availability() {
        let new: NewProduct = serde_json::from_str(
            r#"{"name":"X","price":10,"rating":5,"reviews":900,"availability":"Sold Out"}"#,
        )
        .unwrap();
        let stored = new.into_product(ProductId::from("1"));
        assert_eq!(stored.reviews, 0);
        assert_eq!(stored.availability, "In Stock");
    }

    #[test]
    fn test_patch_is_shallow() {
        let mut p = product("1", "Classic");
        p.notes.top = vec!["Bergamot".into()];
        p.notes.base = vec!["Musk".into()];

        let patch: ProductPatch =
            serde_json::from_str(r#"{"price":45,"notes":{"top":["Lemon"]}}"#).unwrap();
        p.apply(patch);

        assert_eq!(p.price, Decimal::from(45));
        assert_eq!(p.name, "Zafra 1");
        assert_eq!(p.notes.top, ["Lemon"]);
        assert!(p.notes.base.is_empty());
    }

    #[test]
    fn test_price_validation() {
        let new: NewProduct = serde_json::from_str(r#"{"name":"X","price":1e28}"#).unwrap();
        assert_eq!(new.validate().unwrap_err().field, "price");

        let new: NewProduct =
            serde_json::from_str(r#"{"name":"X","price":89,"originalPrice":-1}"#).unwrap();
        assert_eq!(new.validate().unwrap_err().field, "originalPrice");

        let patch: ProductPatch =
            serde_json::from_str(r#"{"price":1e20,"originalPrice":1e-20}"#).unwrap();
        assert_eq!(patch.validate().unwrap_err().field, "price");

        let patch: ProductPatch = serde_json::from_str(r#"{"originalPrice":120}"#).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(product("9", "Fresh")).unwrap();
        assert_eq!(json["originalPrice"], serde_json::json!(60.0));
        assert_eq!(json["id"], "9");
    }
}
