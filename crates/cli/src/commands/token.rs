//! Session token inspection.
//!
//! # Usage
//!
//! ```bash
//! zafra token inspect eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjE3MDAwMDAwMDB9.c2ln
//! ```

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use zafra_core::{Claims, InvalidToken, TokenValidity, check_token};

use super::emit;

/// Run the session gate on `token` and print the verdict.
///
/// # Errors
///
/// Returns the gate's reason when the token would be rejected, so the
/// process exits non-zero.
pub fn inspect(token: &str) -> Result<(), Box<dyn std::error::Error>> {
    let validity = check_token(token, Utc::now());
    emit(&verdict(&validity))?;

    match validity {
        TokenValidity::Valid(_) => Ok(()),
        TokenValidity::Invalid(reason) => Err(reason.into()),
    }
}

/// Describe a gate outcome as JSON.
fn verdict(validity: &TokenValidity) -> Value {
    match validity {
        TokenValidity::Valid(Claims::Opaque) => json!({
            "valid": true,
            "kind": "opaque",
        }),
        TokenValidity::Valid(Claims::Structured(claims)) => json!({
            "valid": true,
            "kind": "structured",
            "expiresAt": claims.expiry(),
            "issuedAt": claims.issued_at.and_then(|secs| DateTime::from_timestamp(secs, 0)),
            "subject": claims.subject,
            "claims": claims.raw,
        }),
        TokenValidity::Invalid(InvalidToken::Missing) => json!({
            "valid": false,
            "reason": "missing",
        }),
        TokenValidity::Invalid(InvalidToken::Expired { expired_at }) => json!({
            "valid": false,
            "reason": "expired",
            "expiredAt": DateTime::from_timestamp(*expired_at, 0),
        }),
    }
}
