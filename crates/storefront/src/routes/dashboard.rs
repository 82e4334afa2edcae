//! Admin dashboard route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use zafra_core::UserProfile;

use crate::middleware::RequireSession;
use crate::services::dashboard::{self, Dashboard, DataSource};
use crate::state::AppState;

/// Dashboard page data.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub user: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Display the dashboard for the signed-in account.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(auth): RequireSession,
) -> Json<DashboardResponse> {
    let dashboard = dashboard::load(state.admin_api(), &auth.token).await;
    let message = loaded_message(&dashboard);

    Json(DashboardResponse {
        dashboard,
        user: auth.user,
        message,
    })
}

/// Success notice, shown only when live data actually came back.
fn loaded_message(dashboard: &Dashboard) -> Option<&'static str> {
    let stats = &dashboard.stats;
    let has_data = stats.total_users > 0
        || stats.total_products > 0
        || stats.total_orders > 0
        || stats.total_reviews > 0;

    (dashboard.source == DataSource::Live && has_data).then_some("Dashboard data loaded successfully!")
}
