//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Register a manager account (password from the environment)
//! ZAFRA_ADMIN_PASSWORD='...' zafra admin register -e ana@example.com -n "Ana Ruiz" -r manager
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_API_URL` - Admin backend base URL (default `http://localhost:8000/admin`)
//! - `ZAFRA_ADMIN_PASSWORD` - Password for the new account, instead of `--password`

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;
use zafra_core::{Registration, RegistrationError, ValidRegistration};
use zafra_storefront::services::admin_api::{AdminApiClient, AdminApiError};

use super::emit;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No password was given on the command line or in the environment.
    #[error("Missing password: pass --password or set ZAFRA_ADMIN_PASSWORD")]
    MissingPassword,

    /// The registration form failed validation.
    #[error("Invalid registration: {0}")]
    Invalid(#[from] RegistrationError),

    /// The admin backend refused or could not be reached.
    #[error("Admin backend error: {0}")]
    Api(#[from] AdminApiError),

    /// The backend response could not be printed.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Validate a new account locally, then register it with the backend.
///
/// # Errors
///
/// Returns an error if the form is invalid or the backend refuses it.
pub async fn register(
    admin_url: Url,
    name: &str,
    email: &str,
    role: &str,
    password: Option<SecretString>,
) -> Result<(), AdminError> {
    let password = password.ok_or(AdminError::MissingPassword)?;
    let registration = validate(name, email, role, &password)?;

    tracing::info!(url = %admin_url, email = %registration.email, role = %registration.role, "Registering account");
    let client = AdminApiClient::new(admin_url)?;
    let response = client.register(&registration).await?;

    tracing::info!("Account registered; sign in through the storefront");
    emit(&response)?;
    Ok(())
}

/// Run the same checks the storefront's registration endpoint runs.
fn validate(
    name: &str,
    email: &str,
    role: &str,
    password: &SecretString,
) -> Result<ValidRegistration, RegistrationError> {
    let password = password.expose_secret().to_owned();
    Registration {
        name: name.to_owned(),
        email: email.to_owned(),
        confirm_password: password.clone(),
        password,
        role: role.to_owned(),
    }
    .validate()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[test]
    fn test_validate_accepts_good_form() {
        let valid = validate("Ana Ruiz", "ana@example.com", "manager", &secret("Passw0rdX")).unwrap();
        assert_eq!(valid.email.as_str(), "ana@example.com");
        assert_eq!(valid.role.to_string(), "manager");
    }

    #[test]
    fn test_validate_rejects_weak_password() {
        assert!(validate("Ana Ruiz", "ana@example.com", "user", &secret("short")).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_role() {
        assert!(validate("Ana Ruiz", "ana@example.com", "owner", &secret("Passw0rdX")).is_err());
    }

    #[tokio::test]
    async fn test_register_requires_password() {
        let url = Url::parse("http://127.0.0.1:9/admin").unwrap();
        let err = register(url, "Ana Ruiz", "ana@example.com", "user", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::MissingPassword));
    }
}
