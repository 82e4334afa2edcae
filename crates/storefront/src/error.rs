//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error is answered as JSON: `{"error": "<message>"}`, with an
//! optional `detail` for malformed request bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use zafra_core::RegistrationError;

use crate::catalog::RepositoryError;
use crate::services::admin_api::AdminApiError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Repository(#[from] RepositoryError),

    /// Admin backend could not be reached or answered garbage.
    #[error("Admin API error: {0}")]
    Upstream(#[from] AdminApiError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Login or registration form failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] RegistrationError),

    /// User is not authenticated, or the backend refused the credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body could not be parsed.
    #[error("Invalid body: {message} ({detail})")]
    InvalidBody { message: String, detail: String },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error payload.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Repository(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) | Self::BadRequest(_) | Self::InvalidBody { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Repository(RepositoryError::Backend(_))
                | Self::Session(_)
                | Self::Internal(_)
                | Self::Upstream(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match self {
            Self::Repository(RepositoryError::NotFound(_)) => ErrorBody {
                error: "Product not found".to_string(),
                detail: None,
            },
            Self::Repository(_) | Self::Session(_) | Self::Internal(_) => ErrorBody {
                error: "Internal server error".to_string(),
                detail: None,
            },
            Self::Upstream(_) => ErrorBody {
                error: "Admin service unavailable".to_string(),
                detail: None,
            },
            Self::Validation(err) => ErrorBody {
                error: err.to_string(),
                detail: None,
            },
            Self::Unauthorized(message) | Self::BadRequest(message) => ErrorBody {
                error: message,
                detail: None,
            },
            Self::InvalidBody { message, detail } => ErrorBody {
                error: message,
                detail: Some(detail),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in account.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
