//! Admin backend API client.
//!
//! The admin backend owns accounts, orders and reviews. The storefront calls
//! it for login and registration, and reads its collections for the
//! dashboard. Collection reads carry the visitor's bearer token; auth calls
//! carry none.

pub mod types;

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;
use zafra_core::{BearerToken, ValidRegistration};

pub use types::{AdminProduct, AdminUser, LoginResponse, Order, Review};

/// Request timeout for every admin call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when interacting with the admin backend.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AdminApiError {
    /// The backend's own explanation, when it sent one.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Whether the backend answered at all (as opposed to a transport or
    /// decoding failure).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Login request body.
#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Admin backend API client.
#[derive(Debug, Clone)]
pub struct AdminApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AdminApiClient {
    /// Create a new admin API client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, AdminApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("zafra-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `Api` when the backend refuses the credentials, `Http` when
    /// it cannot be reached.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AdminApiError> {
        let response = self
            .client
            .post(self.endpoint("auth/login"))
            .json(&LoginBody { email, password })
            .send()
            .await?;
        read_json(response).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `Api` when the backend rejects the registration, `Http` when
    /// it cannot be reached.
    #[tracing::instrument(skip(self, registration), fields(email = %registration.email, role = %registration.role))]
    pub async fn register(
        &self,
        registration: &ValidRegistration,
    ) -> Result<serde_json::Value, AdminApiError> {
        let response = self
            .client
            .post(self.endpoint("auth/register"))
            .json(registration)
            .send()
            .await?;
        read_json(response).await
    }

    /// All accounts.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a user list.
    pub async fn users(&self, token: &BearerToken) -> Result<Vec<AdminUser>, AdminApiError> {
        self.collection("users", token).await
    }

    /// All backend products.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a product list.
    pub async fn products(&self, token: &BearerToken) -> Result<Vec<AdminProduct>, AdminApiError> {
        self.collection("products", token).await
    }

    /// All orders, newest first as the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not an order list.
    pub async fn orders(&self, token: &BearerToken) -> Result<Vec<Order>, AdminApiError> {
        self.collection("orders", token).await
    }

    /// All reviews.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a review list.
    pub async fn reviews(&self, token: &BearerToken) -> Result<Vec<Review>, AdminApiError> {
        self.collection("reviews", token).await
    }

    async fn collection<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &BearerToken,
    ) -> Result<Vec<T>, AdminApiError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header(AUTHORIZATION, bearer_header(token)?)
            .send()
            .await?;
        read_json(response).await
    }
}

/// `Authorization` header value for a token.
fn bearer_header(token: &BearerToken) -> Result<HeaderValue, AdminApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
        .map_err(|e| AdminApiError::Parse(format!("Invalid token format: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Decode a success body, or turn an error status into `Api`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AdminApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AdminApiError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    response
        .json()
        .await
        .map_err(|e| AdminApiError::Parse(e.to_string()))
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `error`, then `message`; anything else yields an empty string.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return String::new();
    };
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .filter(|msg| !msg.trim().is_empty())
        .map(str::to_owned)
        .unwrap_or_default()
}
