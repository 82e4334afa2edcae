//! Authentication route handlers.
//!
//! Handles login, registration and logout against the admin backend. The
//! storefront never sees password hashes; it forwards credentials and keeps
//! the bearer token the backend returns in the visitor's session.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use zafra_core::{AuthSession, Claims, LoginCredentials, Registration, TokenValidity, UserProfile};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::SessionContext;
use crate::middleware::auth::LOGIN_PATH;
use crate::services::admin_api::AdminApiError;
use crate::state::AppState;

/// Fallback when the backend refuses a login without saying why.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password. Please check your credentials.";

/// A 2xx login response that carried no token.
pub const NO_TOKEN_MESSAGE: &str = "Login failed. No token received.";

/// Fallback when the backend refuses a registration without saying why.
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// Where the client should go next after a successful login.
const DASHBOARD_PATH: &str = "/dashboard";

/// Response to a login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub redirect: &'static str,
    pub user: UserProfile,
}

/// Response to a registration or logout.
#[derive(Debug, Serialize)]
pub struct AuthMessage {
    pub message: &'static str,
    pub redirect: &'static str,
}

/// Current session status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Log in through the admin backend.
#[instrument(skip(state, ctx, payload))]
pub async fn login(
    State(state): State<AppState>,
    mut ctx: SessionContext,
    payload: std::result::Result<Json<LoginCredentials>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(credentials) = payload.map_err(|e| AppError::InvalidBody {
        message: "Invalid login request".to_string(),
        detail: e.body_text(),
    })?;
    let email = credentials.validate()?;

    let response = state
        .admin_api()
        .login(email.as_str(), &credentials.password)
        .await
        .map_err(|e| refused_or_upstream(e, LOGIN_FAILED_MESSAGE, AppError::Unauthorized))?;

    let (token, user) = response.into_parts();
    let Some(token) = token else {
        tracing::warn!(email = %email, "Login response carried no token");
        return Err(AppError::Unauthorized(NO_TOKEN_MESSAGE.to_string()));
    };
    let user = user.unwrap_or_else(|| UserProfile::from_email(&email));

    ctx.sign_in(AuthSession::new(token, user.clone(), Utc::now())).await?;
    set_sentry_user(user.email.as_deref().or(Some(email.as_str())));
    tracing::info!(email = %email, "Signed in");

    Ok(Json(LoginResponse {
        message: "Login successful! Redirecting...",
        redirect: DASHBOARD_PATH,
        user,
    }))
}

/// Register a new account with the admin backend.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Registration>, JsonRejection>,
) -> Result<Json<AuthMessage>> {
    let Json(registration) = payload.map_err(|e| AppError::InvalidBody {
        message: "Invalid registration request".to_string(),
        detail: e.body_text(),
    })?;
    let registration = registration.validate()?;

    state
        .admin_api()
        .register(&registration)
        .await
        .map_err(|e| refused_or_upstream(e, REGISTRATION_FAILED_MESSAGE, AppError::BadRequest))?;
    tracing::info!(email = %registration.email, role = %registration.role, "Account registered");

    Ok(Json(AuthMessage {
        message: "Registration successful! Please log in.",
        redirect: LOGIN_PATH,
    }))
}

/// Log out: forget the token, profile and cart.
#[instrument(skip(ctx))]
pub async fn logout(mut ctx: SessionContext) -> Result<Json<AuthMessage>> {
    ctx.sign_out().await?;
    clear_sentry_user();

    Ok(Json(AuthMessage {
        message: "Logged out successfully!",
        redirect: LOGIN_PATH,
    }))
}

/// Report whether the visitor is signed in.
#[instrument(skip(ctx))]
pub async fn session(ctx: SessionContext) -> Json<SessionStatus> {
    let Some(auth) = ctx.auth() else {
        return Json(SessionStatus {
            authenticated: false,
            user: None,
            expires_at: None,
        });
    };

    let status = match auth.token.check(Utc::now()) {
        TokenValidity::Valid(Claims::Structured(claims)) => SessionStatus {
            authenticated: true,
            user: Some(auth.user.clone()),
            expires_at: claims.expiry(),
        },
        TokenValidity::Valid(Claims::Opaque) => SessionStatus {
            authenticated: true,
            user: Some(auth.user.clone()),
            expires_at: None,
        },
        TokenValidity::Invalid(_) => SessionStatus {
            authenticated: false,
            user: None,
            expires_at: None,
        },
    };
    Json(status)
}

/// Surface a backend refusal with its own message; anything else is a 502.
fn refused_or_upstream(
    err: AdminApiError,
    fallback: &str,
    refused: impl FnOnce(String) -> AppError,
) -> AppError {
    if err.is_rejection() {
        tracing::warn!(error = %err, "Admin backend refused request");
        refused(err.api_message().unwrap_or(fallback).to_string())
    } else {
        AppError::Upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_refusal_uses_backend_message() {
        let err = AdminApiError::Api {
            status: 401,
            message: "Account disabled".to_string(),
        };
        let app_err = refused_or_upstream(err, LOGIN_FAILED_MESSAGE, AppError::Unauthorized);
        assert_eq!(app_err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(app_err.to_string(), "Unauthorized: Account disabled");
    }

    #[test]
    fn test_refusal_without_message_uses_fallback() {
        let err = AdminApiError::Api {
            status: 409,
            message: String::new(),
        };
        let app_err = refused_or_upstream(err, REGISTRATION_FAILED_MESSAGE, AppError::BadRequest);
        assert_eq!(app_err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            app_err.to_string(),
            format!("Bad request: {REGISTRATION_FAILED_MESSAGE}")
        );
    }

    #[test]
    fn test_transport_failure_is_upstream() {
        let err = AdminApiError::Parse("unexpected end of input".to_string());
        let app_err = refused_or_upstream(err, LOGIN_FAILED_MESSAGE, AppError::Unauthorized);
        assert_eq!(app_err.status(), StatusCode::BAD_GATEWAY);
    }
}
