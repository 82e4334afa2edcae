//! Newtype IDs for type-safe entity references.
//!
//! Catalog products are keyed by string ids (`"1"`, `"2"`, ...) because that
//! is what the storefront API exchanges. Records owned by the external admin
//! backend use integer ids; the `define_id!` macro creates a wrapper for each
//! so they cannot be mixed up.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe integer ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use zafra_core::define_id;
/// define_id!(ShipmentId);
/// define_id!(InvoiceId);
///
/// let shipment = ShipmentId::new(1);
/// let invoice = InvoiceId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ShipmentId = invoice;
/// # let _ = (shipment, invoice);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Admin backend entity IDs
define_id!(AdminUserId);
define_id!(AdminProductId);
define_id!(OrderId);
define_id!(ReviewId);

/// Identifier of a catalog product.
///
/// Ids are opaque strings on the wire. The catalog assigns decimal integers
/// when it creates products, so [`ProductId::numeric`] is how the next id is
/// derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as an integer, if it is one.
    #[must_use]
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// The id that follows the largest numeric id in `existing`.
    ///
    /// Non-numeric ids are skipped; with no numeric ids at all the first id
    /// is `"1"`.
    #[must_use]
    pub fn next_after<'a>(existing: impl IntoIterator<Item = &'a Self>) -> Self {
        let next = existing
            .into_iter()
            .filter_map(Self::numeric)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self(next.to_string())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_next_after_takes_max_plus_one() {
        let ids = [ProductId::from("1"), ProductId::from("6"), ProductId::from("3")];
        assert_eq!(ProductId::next_after(&ids), ProductId::from("7"));
    }

    #[test]
    fn test_next_after_ignores_non_numeric() {
        let ids = [ProductId::from("limited-edition"), ProductId::from("2")];
        assert_eq!(ProductId::next_after(&ids), ProductId::from("3"));
    }

    #[test]
    fn test_next_after_empty_starts_at_one() {
        assert_eq!(ProductId::next_after(std::iter::empty()), ProductId::from("1"));
    }

    #[test]
    fn test_numeric() {
        assert_eq!(ProductId::from("42").numeric(), Some(42));
        assert_eq!(ProductId::from("abc").numeric(), None);
    }

    #[test]
    fn test_integer_id_serde_is_transparent() {
        let id: OrderId = serde_json::from_str("17").unwrap();
        assert_eq!(id.as_i64(), 17);
        assert_eq!(serde_json::to_string(&ProductId::from("5")).unwrap(), "\"5\"");
    }
}
