//! Login and registration payloads.
//!
//! Both forms are validated here, before anything is sent to the admin
//! backend, so the visitor gets a precise message for the first field that
//! is wrong.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Email, EmailError};

/// Minimum length of a display name.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Reasons a login or registration form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Name must be at least 2 characters long")]
    NameTooShort,
    #[error("Name must contain only letters and spaces")]
    NameCharacters,
    #[error("Invalid email address")]
    InvalidEmail(#[from] EmailError),
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Password must contain at least one lowercase letter")]
    PasswordLowercase,
    #[error("Password must contain at least one uppercase letter")]
    PasswordUppercase,
    #[error("Password must contain at least one number")]
    PasswordDigit,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please select a role")]
    InvalidRole,
}

/// Account role requested at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer access.
    User,
    /// Full system access.
    Admin,
    /// Product and order management.
    Manager,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            _ => Err(RegistrationError::InvalidRole),
        }
    }
}

/// Login form as submitted.
#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginCredentials {
    /// Check the form and return the parsed email.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` or `PasswordRequired`.
    pub fn validate(&self) -> Result<Email, RegistrationError> {
        let email = Email::parse(self.email.trim())?;
        if self.password.is_empty() {
            return Err(RegistrationError::PasswordRequired);
        }
        Ok(email)
    }
}

/// Registration form as submitted.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Kept as text so an unknown role is a validation error, not a parse
    /// failure of the whole body.
    #[serde(default)]
    pub role: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// A registration that passed validation, ready for the backend.
///
/// The password confirmation is dropped; it never leaves the storefront.
#[derive(Clone, Serialize)]
pub struct ValidRegistration {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for ValidRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidRegistration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Registration {
    /// Validate every field, in form order.
    ///
    /// # Errors
    ///
    /// Returns the first rule the form breaks.
    pub fn validate(self) -> Result<ValidRegistration, RegistrationError> {
        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_LENGTH {
            return Err(RegistrationError::NameTooShort);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '\'' || c == '-')
        {
            return Err(RegistrationError::NameCharacters);
        }

        let email = Email::parse(self.email.trim())?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        let role = self.role.parse()?;

        Ok(ValidRegistration {
            name: name.to_owned(),
            email,
            password: self.password,
            role,
        })
    }
}

/// Password rules for new accounts.
///
/// # Errors
///
/// Returns the first rule `password` breaks.
pub fn validate_password(password: &str) -> Result<(), RegistrationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RegistrationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(RegistrationError::PasswordLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(RegistrationError::PasswordUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(RegistrationError::PasswordDigit);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> Registration {
        Registration {
            name: "Amira O'Neil-Haddad".to_owned(),
            email: "amira@zafra.com".to_owned(),
            password: "Jasmine2024".to_owned(),
            confirm_password: "Jasmine2024".to_owned(),
            role: "manager".to_owned(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let valid = form().validate().unwrap();
        assert_eq!(valid.role, Role::Manager);
        assert_eq!(valid.email.as_str(), "amira@zafra.com");
    }

    #[test]
    fn test_registration_payload_omits_confirmation() {
        let json = serde_json::to_value(form().validate().unwrap()).unwrap();
        assert_eq!(json["role"], "manager");
        assert!(json.get("confirmPassword").is_none());
        assert!(json.get("confirm_password").is_none());
    }

    #[test]
    fn test_name_rules() {
        let short = Registration { name: "A".into(), ..form() };
        assert_eq!(short.validate().unwrap_err(), RegistrationError::NameTooShort);

        let digits = Registration { name: "Agent 47".into(), ..form() };
        assert_eq!(digits.validate().unwrap_err(), RegistrationError::NameCharacters);
    }

    #[test]
    fn test_password_rules() {
        let cases = [
            ("Sh0rt", RegistrationError::PasswordTooShort),
            ("ALLUPPER123", RegistrationError::PasswordLowercase),
            ("alllower123", RegistrationError::PasswordUppercase),
            ("NoDigitsHere", RegistrationError::PasswordDigit),
        ];
        for (password, expected) in cases {
            let reg = Registration {
                password: password.into(),
                confirm_password: password.into(),
                ..form()
            };
            assert_eq!(reg.validate().unwrap_err(), expected, "{password}");
        }
    }

    #[test]
    fn test_password_mismatch() {
        let reg = Registration { confirm_password: "Jasmine2025".into(), ..form() };
        assert_eq!(reg.validate().unwrap_err(), RegistrationError::PasswordMismatch);
    }

    #[test]
    fn test_role_must_be_known() {
        let reg = Registration { role: "owner".into(), ..form() };
        assert_eq!(reg.validate().unwrap_err(), RegistrationError::InvalidRole);
        let reg = Registration { role: String::new(), ..form() };
        assert_eq!(reg.validate().unwrap_err(), RegistrationError::InvalidRole);
    }

    #[test]
    fn test_login_validation() {
        let ok = LoginCredentials { email: "jane@example.com".into(), password: "x".into() };
        assert!(ok.validate().is_ok());

        let no_password = LoginCredentials { email: "jane@example.com".into(), password: String::new() };
        assert_eq!(no_password.validate().unwrap_err(), RegistrationError::PasswordRequired);

        let bad_email = LoginCredentials { email: "jane".into(), password: "x".into() };
        assert!(matches!(bad_email.validate(), Err(RegistrationError::InvalidEmail(_))));
    }

    #[test]
    fn test_debug_hides_passwords() {
        let creds = LoginCredentials { email: "jane@example.com".into(), password: "hunter2".into() };
        assert!(!format!("{creds:?}").contains("hunter2"));
        assert!(!format!("{:?}", form()).contains("Jasmine2024"));
    }
}
