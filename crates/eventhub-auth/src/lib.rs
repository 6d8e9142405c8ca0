//! Credential handling for the EventHub platform.
//!
//! Two independent identity classes share one token encoding: regular users
//! (subject is a database-backed user id) and the single administrator
//! (subject is the configured admin email, `isAdmin: true`). Verification is
//! stateless, a pure function of the token, the signing secret, and the
//! clock, so the identity gates never touch the store.

mod claims;
mod password;

pub use claims::{issue_admin_token, issue_user_token, verify_token, Claims};
pub use password::{hash_password, verify_password};

use thiserror::Error;

/// Errors that can occur while verifying or issuing credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token string is not a well-formed signed token.
    #[error("malformed token")]
    MalformedToken,
    /// The token signature does not match the configured secret.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The token's expiry claim is in the past.
    #[error("token expired")]
    Expired,
    /// Admin email or password mismatch. Deliberately a single variant so
    /// the caller cannot learn which field was wrong.
    #[error("invalid admin credentials")]
    InvalidCredentials,
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),
}

/// The fixed administrator credential pair, loaded from configuration at
/// startup and immutable thereafter.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    /// The administrator email. Never a database-backed user.
    pub email: String,
    /// Hex-encoded SHA-256 digest of the administrator password.
    pub password_hash: String,
}

/// Checks a login attempt against the configured administrator credentials.
///
/// The password digest comparison is constant-time, and the same
/// `InvalidCredentials` error is returned for a wrong email and a wrong
/// password.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] on any mismatch.
pub fn verify_admin_credentials(
    email: &str,
    password: &str,
    credentials: &AdminCredentials,
) -> Result<(), AuthError> {
    // Evaluate both checks before branching so a wrong email does not
    // short-circuit past the hash comparison.
    let email_ok = email == credentials.email;
    let password_ok = verify_password(password, &credentials.password_hash);

    if email_ok && password_ok {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}
