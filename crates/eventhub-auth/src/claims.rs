//! Typed token claims and stateless verification.

use crate::AuthError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The claim set carried by every EventHub bearer token.
///
/// A fixed, explicitly-typed record: unknown claims are ignored on decode,
/// missing required claims (`sub`, `exp`) are rejected. A user token carries
/// the user id as subject with `isAdmin` absent; an admin token carries the
/// configured admin email as subject with `isAdmin: true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: user id for user tokens, admin email for admin tokens.
    pub sub: String,
    /// Administrator flag. Absent (false) on user tokens.
    #[serde(rename = "isAdmin", default, skip_serializing_if = "is_false")]
    pub is_admin: bool,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: u64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(flag: &bool) -> bool {
    !*flag
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn issue(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Encoding)
}

/// Issues a signed user token with the given time-to-live.
///
/// # Errors
///
/// Returns [`AuthError::Encoding`] if token serialization fails.
pub fn issue_user_token(user_id: &str, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    let now = unix_now();
    issue(
        &Claims {
            sub: user_id.to_string(),
            is_admin: false,
            exp: now + ttl.as_secs(),
            iat: now,
        },
        secret,
    )
}

/// Issues a signed admin token (`isAdmin: true`) with the given time-to-live.
///
/// # Errors
///
/// Returns [`AuthError::Encoding`] if token serialization fails.
pub fn issue_admin_token(email: &str, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    let now = unix_now();
    issue(
        &Claims {
            sub: email.to_string(),
            is_admin: true,
            exp: now + ttl.as_secs(),
            iat: now,
        },
        secret,
    )
}

/// Verifies a bearer token and returns its claim set.
///
/// Pure function of (token, secret, current time); consults no store and has
/// no side effects.
///
/// # Errors
///
/// - [`AuthError::MalformedToken`] if the string is not a well-formed JWT or
///   lacks a required claim.
/// - [`AuthError::InvalidSignature`] if the signature does not match `secret`.
/// - [`AuthError::Expired`] if the expiry claim is in the past.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken,
    })?;

    Ok(data.claims)
}
