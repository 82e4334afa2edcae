//! Bearer tokens and the session gate.
//!
//! The storefront never verifies tokens: they are issued and enforced by the
//! admin backend. What it does is a lax, best-effort expiry check so a
//! visitor holding an obviously stale token is sent back to the login page
//! instead of hitting backend errors.
//!
//! [`check_token`] is the single decision point. Tokens in the three-segment
//! `header.payload.signature` form have their payload decoded and any `exp`
//! claim compared against `now`; every other token, including ones whose
//! payload will not decode, is accepted as opaque.

use core::fmt;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Email;

/// An opaque bearer credential issued by the admin backend.
///
/// `Debug` is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Run the session gate against this token.
    #[must_use]
    pub fn check(&self, now: DateTime<Utc>) -> TokenValidity {
        check_token(&self.0, now)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Claims decoded from a structured token's payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    /// `exp`, seconds since the epoch.
    pub expires_at: Option<i64>,
    /// `iat`, seconds since the epoch.
    pub issued_at: Option<i64>,
    /// `sub`, stringified when the issuer used a number.
    pub subject: Option<String>,
    /// Every claim, as decoded.
    pub raw: Map<String, Value>,
}

impl ClaimSet {
    fn from_map(raw: Map<String, Value>) -> Self {
        Self {
            expires_at: raw.get("exp").and_then(timestamp),
            issued_at: raw.get("iat").and_then(timestamp),
            subject: raw.get("sub").and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            raw,
        }
    }

    /// Expiry as a timestamp, if the claim is present and in range.
    #[must_use]
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[allow(clippy::cast_possible_truncation)] // fractional epoch seconds are floored
fn timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.floor() as i64))
}

/// What the gate learned about a token it accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Claims {
    /// The token is not in structured form (or its payload did not decode).
    Opaque,
    /// The token's payload decoded into a claim set.
    Structured(ClaimSet),
}

/// Why the gate rejected a token.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidToken {
    /// No token was supplied.
    #[error("no session token")]
    Missing,
    /// The token's `exp` claim is in the past.
    #[error("session expired")]
    Expired {
        /// The `exp` claim, seconds since the epoch.
        expired_at: i64,
    },
}

/// Outcome of [`check_token`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValidity {
    Valid(Claims),
    Invalid(InvalidToken),
}

impl TokenValidity {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Decide whether `token` still opens a session at `now`.
///
/// A token whose `exp` equals `now` is still valid; it is rejected from the
/// next second on.
#[must_use]
pub fn check_token(token: &str, now: DateTime<Utc>) -> TokenValidity {
    let token = token.trim();
    if token.is_empty() {
        return TokenValidity::Invalid(InvalidToken::Missing);
    }

    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return TokenValidity::Valid(Claims::Opaque);
    };

    let Some(claims) = decode_payload(payload) else {
        return TokenValidity::Valid(Claims::Opaque);
    };

    match claims.expires_at {
        Some(exp) if exp < now.timestamp() => {
            TokenValidity::Invalid(InvalidToken::Expired { expired_at: exp })
        }
        _ => TokenValidity::Valid(Claims::Structured(claims)),
    }
}

/// Decode a base64 (URL-safe or standard, padded or not) JSON object.
fn decode_payload(segment: &str) -> Option<ClaimSet> {
    let trimmed = segment.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(map) => Some(ClaimSet::from_map(map)),
        _ => None,
    }
}

/// Profile of the signed-in account, as returned by the backend.
///
/// Only the fields the storefront reads are typed; everything else the
/// backend sends is kept in `extra` and echoed back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// A profile carrying just the email the visitor logged in with.
    #[must_use]
    pub fn from_email(email: &Email) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Self::default()
        }
    }
}

/// A signed-in session: the backend's token plus the account profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: BearerToken,
    pub user: UserProfile,
    pub signed_in_at: DateTime<Utc>,
}

impl AuthSession {
    #[must_use]
    pub const fn new(token: BearerToken, user: UserProfile, signed_in_at: DateTime<Utc>) -> Self {
        Self {
            token,
            user,
            signed_in_at,
        }
    }

    /// Whether this session passes the gate at `now`.
    #[must_use]
    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.token.check(now).is_valid()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn jwt(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_missing_token_is_invalid() {
        assert_eq!(check_token("", at(0)), TokenValidity::Invalid(InvalidToken::Missing));
        assert_eq!(check_token("   ", at(0)), TokenValidity::Invalid(InvalidToken::Missing));
    }

    #[test]
    fn test_opaque_token_is_valid() {
        assert_eq!(
            check_token("4f2c9a1b7e", at(1_700_000_000)),
            TokenValidity::Valid(Claims::Opaque)
        );
        assert_eq!(check_token("a.b", at(0)), TokenValidity::Valid(Claims::Opaque));
    }

    #[test]
    fn test_undecodable_structured_token_is_valid() {
        assert_eq!(check_token("x.%%%.y", at(0)), TokenValidity::Valid(Claims::Opaque));
        let not_json = format!("x.{}.y", URL_SAFE_NO_PAD.encode("hello"));
        assert_eq!(check_token(&not_json, at(0)), TokenValidity::Valid(Claims::Opaque));
    }

    #[test]
    fn test_future_expiry_is_valid() {
        let token = jwt(&serde_json::json!({"sub": 42, "exp": 2_000}));
        match check_token(&token, at(1_000)) {
            TokenValidity::Valid(Claims::Structured(claims)) => {
                assert_eq!(claims.expires_at, Some(2_000));
                assert_eq!(claims.subject.as_deref(), Some("42"));
            }
            other => panic!("expected structured claims, got {other:?}"),
        }
    }

    #[test]
    fn test_past_expiry_is_invalid() {
        let token = jwt(&serde_json::json!({"exp": 999}));
        assert_eq!(
            check_token(&token, at(1_000)),
            TokenValidity::Invalid(InvalidToken::Expired { expired_at: 999 })
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let token = jwt(&serde_json::json!({"exp": 1_000}));
        assert!(check_token(&token, at(1_000)).is_valid());
        assert!(!check_token(&token, at(1_001)).is_valid());
    }

    #[test]
    fn test_structured_token_without_exp_is_valid() {
        let token = jwt(&serde_json::json!({"sub": "jane"}));
        assert!(check_token(&token, at(5)).is_valid());
    }

    #[test]
    fn test_standard_base64_payload_is_accepted() {
        let payload = STANDARD_NO_PAD.encode(r#"{"exp":1}"#);
        let token = format!("h.{payload}==.s");
        assert!(!check_token(&token, at(10)).is_valid());
    }

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = BearerToken::new("super-secret-token");
        assert!(!format!("{token:?}").contains("super-secret"));
    }

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id":7,"name":"Jane","email":"jane@example.com","role":"admin"}"#)
                .unwrap();
        assert_eq!(profile.name.as_deref(), Some("Jane"));
        assert_eq!(profile.extra.get("id"), Some(&serde_json::json!(7)));
        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["id"], 7);
    }
}
