//! Identity gates for protected routes.
//!
//! Two extractors wrap protected handlers: [`UserContext`] for user-gated
//! routes and [`AdminContext`] for admin-gated routes. Both read
//! `Authorization: Bearer <token>`, verify it statelessly against the
//! configured secret, and attach the verified identity before any domain
//! logic runs. A handler that takes one of these as an argument can never
//! execute with an unverified caller.
//!
//! The two gates deliberately signal failure differently: the user gate
//! rejects with 401 (authentication), the admin gate with 403
//! (authorization), including for a valid token that merely lacks the
//! admin claim.

use crate::{error::ApiError, AppState};
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use eventhub_auth::{verify_token, Claims};
use std::sync::Arc;

/// Verified identity of a regular user, attached by the user gate.
#[derive(Clone, Debug)]
pub struct UserContext {
    /// The user id carried as the token subject.
    pub user_id: String,
}

/// Verified administrator identity, attached by the admin gate.
#[derive(Clone, Debug)]
pub struct AdminContext {
    /// The configured administrator email carried as the token subject.
    pub email: String,
}

/// Pulls the bearer token out of the `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Verifies the request's bearer token against the configured secret.
fn verify_request(parts: &Parts) -> Result<Option<Claims>, ApiError> {
    let state = parts
        .extensions
        .get::<Arc<AppState>>()
        .ok_or_else(|| ApiError::InternalServerError("missing app state".to_string()))?;

    Ok(bearer_token(parts).and_then(|token| verify_token(token, &state.jwt_secret).ok()))
}

impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = verify_request(parts)?
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))?;

        // An admin token's subject is the configured admin email, not a
        // database-backed user id; it cannot pass the user gate.
        if claims.is_admin {
            return Err(ApiError::Unauthorized(
                "authentication required".to_string(),
            ));
        }

        Ok(UserContext {
            user_id: claims.sub,
        })
    }
}

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = verify_request(parts)?
            .filter(|claims| claims.is_admin)
            .ok_or_else(|| ApiError::Forbidden("admin access denied".to_string()))?;

        Ok(AdminContext { email: claims.sub })
    }
}
