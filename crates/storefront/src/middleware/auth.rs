//! Session context and authentication extractors.
//!
//! [`SessionContext`] is the one place handlers get visitor state from: it is
//! loaded from the tower-sessions store once per request and written back
//! through its own methods. [`RequireSession`] gates routes on a signed-in,
//! unexpired session.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::ACCEPT, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use tower_sessions::Session;
use zafra_core::{AuthSession, Cart, InvalidToken, TokenValidity};

use crate::error::AppError;
use crate::models::session_keys;

/// Where the gate sends browsers without a session.
pub const LOGIN_PATH: &str = "/login";

/// Message shown when a stored token has expired.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// The visitor's session state: auth (if signed in) and cart.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut ctx: SessionContext) -> Result<Json<Cart>> {
///     ctx.update_cart(|cart| cart.clear()).await?;
///     Ok(Json(ctx.cart().clone()))
/// }
/// ```
#[derive(Debug)]
pub struct SessionContext {
    session: Session,
    auth: Option<AuthSession>,
    cart: Cart,
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        Self::load(session).await
    }
}

impl SessionContext {
    /// Read auth and cart from `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: Session) -> Result<Self, AppError> {
        let auth = session.get::<AuthSession>(session_keys::AUTH).await?;
        let cart = session
            .get::<Cart>(session_keys::CART)
            .await?
            .unwrap_or_default();

        Ok(Self { session, auth, cart })
    }

    /// The stored sign-in, whether or not it is still valid.
    #[must_use]
    pub const fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    /// Run the session gate at `now`.
    ///
    /// # Errors
    ///
    /// Returns `Missing` when nobody is signed in, `Expired` when the stored
    /// token's `exp` claim has passed.
    pub fn gate(&self, now: DateTime<Utc>) -> Result<&AuthSession, InvalidToken> {
        let auth = self.auth.as_ref().ok_or(InvalidToken::Missing)?;
        match auth.token.check(now) {
            TokenValidity::Valid(_) => Ok(auth),
            TokenValidity::Invalid(reason) => Err(reason),
        }
    }

    /// Whether the session passes the gate right now.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.gate(Utc::now()).is_ok()
    }

    /// The visitor's cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutate the cart and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn update_cart<R>(&mut self, f: impl FnOnce(&mut Cart) -> R) -> Result<R, AppError> {
        let result = f(&mut self.cart);
        self.session.insert(session_keys::CART, &self.cart).await?;
        Ok(result)
    }

    /// Store a new sign-in, rotating the session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn sign_in(&mut self, auth: AuthSession) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(session_keys::AUTH, &auth).await?;
        self.auth = Some(auth);
        Ok(())
    }

    /// Forget the sign-in but keep the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn clear_auth(&mut self) -> Result<(), AppError> {
        self.session
            .remove::<AuthSession>(session_keys::AUTH)
            .await?;
        self.auth = None;
        Ok(())
    }

    /// Tear the session down: token, profile and cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub async fn sign_out(&mut self) -> Result<(), AppError> {
        self.session.flush().await?;
        self.auth = None;
        self.cart = Cart::new();
        Ok(())
    }
}

/// Extractor that requires a signed-in session with a valid token.
///
/// If the gate fails, any stale sign-in is cleared and the request is
/// answered with a redirect to the login page (or `401` for JSON clients).
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession(auth): RequireSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {:?}!", auth.user.name)
/// }
/// ```
#[derive(Debug)]
pub struct RequireSession(pub AuthSession);

/// Error returned when a signed-in session is required but absent.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for browser requests).
    RedirectToLogin,
    /// Unauthorized response (for JSON requests).
    Unauthorized(InvalidToken),
    /// The session store failed.
    Session(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized(reason) => {
                let message = match reason {
                    InvalidToken::Missing => "Authentication required",
                    InvalidToken::Expired { .. } => SESSION_EXPIRED_MESSAGE,
                };
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({ "error": message })),
                )
                    .into_response()
            }
            Self::Session(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let wants_json = wants_json(&parts.headers);
        let mut ctx = SessionContext::from_request_parts(parts, state)
            .await
            .map_err(AuthRejection::Session)?;

        let reason = match ctx.gate(Utc::now()) {
            Ok(auth) => return Ok(Self(auth.clone())),
            Err(reason) => reason,
        };

        if let InvalidToken::Expired { expired_at } = reason {
            tracing::info!(expired_at, "Clearing expired session");
            ctx.clear_auth().await.map_err(AuthRejection::Session)?;
        }

        if wants_json {
            Err(AuthRejection::Unauthorized(reason))
        } else {
            Err(AuthRejection::RedirectToLogin)
        }
    }
}

/// Whether the client prefers a JSON answer over a redirect.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
