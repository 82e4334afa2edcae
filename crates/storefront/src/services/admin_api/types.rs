//! Wire types for the admin backend.
//!
//! The backend is not ours, so every field a record might omit is
//! defaulted rather than failing the whole collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zafra_core::{AdminProductId, AdminUserId, BearerToken, OrderId, ReviewId, UserProfile};

/// An account registered with the admin backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: AdminUserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: String,
}

/// A product as the admin backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProduct {
    pub id: AdminProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: AdminUserId,
    pub product_id: AdminProductId,
    #[serde(default)]
    pub quantity: u32,
    /// Missing or null amounts count as zero revenue.
    #[serde(
        default,
        deserialize_with = "amount_or_zero",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AdminUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<AdminProduct>,
}

fn amount_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    rust_decimal::serde::float_option::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A product review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: AdminUserId,
    pub product_id: AdminProductId,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: String,
}

/// Body of a successful login.
///
/// Backends disagree on the token field name, so both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    token: Option<BearerToken>,
    #[serde(default)]
    access_token: Option<BearerToken>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl LoginResponse {
    /// Split into the issued token and the profile, if any.
    ///
    /// The token is `token` when present and non-empty, else `access_token`.
    #[must_use]
    pub fn into_parts(self) -> (Option<BearerToken>, Option<UserProfile>) {
        let non_empty = |t: &BearerToken| !t.expose().trim().is_empty();
        let token = self
            .token
            .filter(non_empty)
            .or_else(|| self.access_token.filter(non_empty));
        (token, self.user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_prefers_token() {
        let body: LoginResponse =
            serde_json::from_str(r#"{"token":"abc","access_token":"def"}"#).unwrap();
        let (token, user) = body.into_parts();
        assert_eq!(token.unwrap().expose(), "abc");
        assert!(user.is_none());
    }

    #[test]
    fn test_login_response_falls_back_to_access_token() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"token":"","access_token":"def","user":{"name":"Jane","email":"jane@example.com"}}"#,
        )
        .unwrap();
        let (token, user) = body.into_parts();
        assert_eq!(token.unwrap().expose(), "def");
        assert_eq!(user.unwrap().name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_login_response_without_token() {
        let body: LoginResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(body.into_parts().0.is_none());
    }

    #[test]
    fn test_order_tolerates_missing_amount() {
        let order: Order = serde_json::from_str(
            r#"{"id":1,"user_id":2,"product_id":3,"total_amount":null,"status":"Pending"}"#,
        )
        .unwrap();
        assert_eq!(order.total_amount, Decimal::ZERO);

        let order: Order =
            serde_json::from_str(r#"{"id":1,"user_id":2,"product_id":3,"total_amount":145.5}"#)
                .unwrap();
        assert_eq!(order.total_amount, Decimal::new(1455, 1));
    }
}
