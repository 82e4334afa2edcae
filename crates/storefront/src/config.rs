//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run the storefront locally
//! against an admin backend on port 8000.
//!
//! - `ZAFRA_HOST` - Bind address (default: 127.0.0.1)
//! - `ZAFRA_PORT` - Listen port (default: 3000)
//! - `ZAFRA_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `ADMIN_API_URL` - Admin backend base URL (default: <http://localhost:8000/admin>)
//! - `ZAFRA_CORS_ORIGIN` - Origin allowed to call the API cross-site
//! - `ZAFRA_FREE_SHIPPING_OVER` - Subtotal above which shipping is free (default: 75)
//! - `ZAFRA_FLAT_SHIPPING` - Shipping fee below the threshold (default: 10)
//! - `ZAFRA_TAX_RATE` - Sales tax as a fraction (default: 0.08)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;
use zafra_core::PricingPolicy;

/// Default admin backend location.
pub const DEFAULT_ADMIN_API_URL: &str = "http://localhost:8000/admin";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Admin backend base URL (auth and admin collections live under it)
    pub admin_api_url: Url,
    /// Origin allowed by the CORS layer, if any
    pub cors_origin: Option<String>,
    /// Shipping and tax rules for cart summaries
    pub pricing: PricingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (production, staging, ...)
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            admin_api_url: default_admin_api_url(),
            cors_origin: None,
            pricing: PricingPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

#[allow(clippy::expect_used)] // constant URL
fn default_admin_api_url() -> Url {
    Url::parse(DEFAULT_ADMIN_API_URL).expect("default admin API URL is valid")
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("ZAFRA_HOST", "127.0.0.1")?;
        let port = parse_env("ZAFRA_PORT", "3000")?;
        let base_url = get_env_or_default("ZAFRA_BASE_URL", "http://localhost:3000");
        let admin_api_url = parse_admin_url(&get_env_or_default("ADMIN_API_URL", DEFAULT_ADMIN_API_URL))?;
        let cors_origin = get_optional_env("ZAFRA_CORS_ORIGIN");

        let defaults = PricingPolicy::default();
        let pricing = PricingPolicy {
            free_shipping_over: parse_decimal_env("ZAFRA_FREE_SHIPPING_OVER", defaults.free_shipping_over)?,
            flat_shipping: parse_decimal_env("ZAFRA_FLAT_SHIPPING", defaults.flat_shipping)?,
            tax_rate: parse_decimal_env("ZAFRA_TAX_RATE", defaults.tax_rate)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            admin_api_url,
            cors_origin,
            pricing,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a non-negative decimal, falling back to `default` when unset.
fn parse_decimal_env(key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    parse_decimal(&raw).map_err(|msg| ConfigError::InvalidEnvVar(key.to_string(), msg))
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(raw.trim()).map_err(|e| e.to_string())?;
    if value.is_sign_negative() {
        return Err("must not be negative".to_string());
    }
    Ok(value)
}

/// Parse the admin backend URL, normalising away any trailing slash.
fn parse_admin_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "ADMIN_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.admin_api_url.as_str(), "http://localhost:8000/admin");
        assert_eq!(config.pricing, PricingPolicy::default());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("75").unwrap(), Decimal::from(75));
        assert_eq!(parse_decimal(" 0.08 ").unwrap(), Decimal::new(8, 2));
        assert!(parse_decimal("-1").is_err());
        assert!(parse_decimal("ten").is_err());
    }

    #[test]
    fn test_parse_admin_url() {
        let url = parse_admin_url("https://api.zafra.com/admin/").unwrap();
        assert_eq!(url.as_str(), "https://api.zafra.com/admin");

        assert!(matches!(
            parse_admin_url("ftp://api.zafra.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_admin_url("not a url").is_err());
    }

    #[test]
    fn test_secure_cookies_follow_base_url() {
        let config = StorefrontConfig {
            base_url: "https://zafraperfume.com".to_string(),
            ..StorefrontConfig::default()
        };
        assert!(config.is_secure());
    }
}
