//! User signup and login handlers.
//!
//! Both exchange credentials for a signed user token. Login failure is a
//! single message whether the email is unknown or the password is wrong.

use crate::error::ApiError;
use crate::AppState;
use axum::{extract::Extension, http::StatusCode, response::Json};
use eventhub_auth::{hash_password, issue_user_token, verify_password};
use eventhub_registry::{create_user, find_user_by_email};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maximum length for names, emails, and passwords.
const MAX_CREDENTIAL_LEN: usize = 256;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: String,
}

fn check_lengths(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    for (field, value) in fields {
        if value.len() > MAX_CREDENTIAL_LEN {
            return Err(ApiError::BadRequest(format!(
                "{field} exceeds {MAX_CREDENTIAL_LEN} bytes"
            )));
        }
    }
    Ok(())
}

/// POST /api/auth/signup
pub async fn signup_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    check_lengths(&[
        ("name", &payload.name),
        ("email", &payload.email),
        ("password", &payload.password),
    ])?;
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("password is required".to_string()));
    }

    let password_hash = hash_password(&payload.password);
    let pool = state.pool.clone();
    let user = tokio::task::spawn_blocking(move || {
        let conn = pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        create_user(&conn, &payload.name, &payload.email, &password_hash).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    let token = issue_user_token(&user.user_id, &state.jwt_secret, state.token_ttl)
        .map_err(|e| ApiError::internal("token issuance failed", e))?;

    tracing::info!(user_id = %user.user_id, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            user_id: user.user_id,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    check_lengths(&[("email", &payload.email), ("password", &payload.password)])?;

    let pool = state.pool.clone();
    let email = payload.email.clone();
    let user = tokio::task::spawn_blocking(move || {
        let conn = pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        find_user_by_email(&conn, &email).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    // One failure message for unknown email and wrong password alike.
    let invalid = || ApiError::Unauthorized("invalid credentials".to_string());
    let user = user.ok_or_else(invalid)?;
    if !verify_password(&payload.password, &user.password_hash) {
        return Err(invalid());
    }

    let token = issue_user_token(&user.user_id, &state.jwt_secret, state.token_ttl)
        .map_err(|e| ApiError::internal("token issuance failed", e))?;

    Ok(Json(TokenResponse {
        token,
        user_id: user.user_id,
    }))
}
