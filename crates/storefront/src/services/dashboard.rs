//! Admin dashboard aggregation.
//!
//! Reads the four admin collections concurrently. A failed endpoint costs
//! only its own numbers; when every endpoint fails the dashboard shows a
//! fixed demo snapshot instead.

use rust_decimal::Decimal;
use serde::Serialize;
use zafra_core::{AdminProductId, AdminUserId, BearerToken, OrderId};

use super::admin_api::{AdminApiClient, AdminApiError, AdminProduct, AdminUser, Order, Review};

/// Number of orders shown in the recent-orders table.
pub const RECENT_ORDER_COUNT: usize = 10;

/// Warning shown when the backend is entirely unreachable.
pub const DEMO_WARNING: &str = "Backend not available. Showing demo data.";

/// Headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_products: usize,
    pub total_orders: usize,
    pub total_reviews: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

/// Where the dashboard figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Demo,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub source: DataSource,
    pub stats: DashboardStats,
    pub recent_orders: Vec<Order>,
    pub warnings: Vec<String>,
}

/// Fetch users, products, orders and reviews concurrently and aggregate them.
#[tracing::instrument(skip_all)]
pub async fn load(client: &AdminApiClient, token: &BearerToken) -> Dashboard {
    let (users, products, orders, reviews) = tokio::join!(
        client.users(token),
        client.products(token),
        client.orders(token),
        client.reviews(token),
    );
    aggregate(users, products, orders, reviews)
}

/// Combine per-endpoint results into a dashboard.
#[must_use]
pub fn aggregate(
    users: Result<Vec<AdminUser>, AdminApiError>,
    products: Result<Vec<AdminProduct>, AdminApiError>,
    orders: Result<Vec<Order>, AdminApiError>,
    reviews: Result<Vec<Review>, AdminApiError>,
) -> Dashboard {
    if users.is_err() && products.is_err() && orders.is_err() && reviews.is_err() {
        tracing::warn!("Admin backend unreachable, serving demo dashboard");
        return demo();
    }

    let mut warnings = Vec::new();
    let users = settle("Users", users, &mut warnings);
    let products = settle("Products", products, &mut warnings);
    let mut orders = settle("Orders", orders, &mut warnings);
    let reviews = settle("Reviews", reviews, &mut warnings);

    let stats = DashboardStats {
        total_users: users.len(),
        total_products: products.len(),
        total_orders: orders.len(),
        total_reviews: reviews.len(),
        total_revenue: orders.iter().map(|o| o.total_amount).sum(),
    };
    orders.truncate(RECENT_ORDER_COUNT);

    Dashboard {
        source: DataSource::Live,
        stats,
        recent_orders: orders,
        warnings,
    }
}

/// Unwrap one endpoint's result, recording a warning on failure.
fn settle<T>(name: &str, result: Result<Vec<T>, AdminApiError>, warnings: &mut Vec<String>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "{name} API failed");
        warnings.push(format!("{name} API failed"));
        Vec::new()
    })
}

/// The fixed snapshot shown when the backend is down.
#[must_use]
pub fn demo() -> Dashboard {
    Dashboard {
        source: DataSource::Demo,
        stats: DashboardStats {
            total_users: 2543,
            total_products: 24,
            total_orders: 1423,
            total_reviews: 0,
            total_revenue: Decimal::from(52_340),
        },
        recent_orders: vec![
            demo_order(
                1,
                ("John Doe", "john@example.com", "2024-01-01"),
                ("Zafra Classic", 89, "Classic fragrance"),
                ("Completed", "2024-01-15"),
            ),
            demo_order(
                2,
                ("Jane Smith", "jane@example.com", "2024-01-02"),
                ("Zafra Premium", 145, "Premium fragrance"),
                ("Processing", "2024-01-14"),
            ),
        ],
        warnings: vec![DEMO_WARNING.to_string()],
    }
}

fn demo_order(
    id: i64,
    (name, email, joined): (&str, &str, &str),
    (product_name, price, description): (&str, i64, &str),
    (status, placed): (&str, &str),
) -> Order {
    Order {
        id: OrderId::new(id),
        user_id: AdminUserId::new(id),
        product_id: AdminProductId::new(id),
        quantity: 1,
        total_amount: Decimal::from(price),
        status: status.to_string(),
        created_at: placed.to_string(),
        user: Some(AdminUser {
            id: AdminUserId::new(id),
            name: name.to_string(),
            email: email.to_string(),
            created_at: joined.to_string(),
        }),
        product: Some(AdminProduct {
            id: AdminProductId::new(id),
            name: product_name.to_string(),
            price: Decimal::from(price),
            description: description.to_string(),
            created_at: joined.to_string(),
        }),
    }
}
