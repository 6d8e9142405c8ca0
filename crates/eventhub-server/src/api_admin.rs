//! Administrator handlers: the credential exchange and registrant lists.

use crate::error::ApiError;
use crate::middleware::AdminContext;
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    response::Json,
};
use eventhub_auth::{issue_admin_token, verify_admin_credentials};
use eventhub_registry::{list_attendees, Attendee};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AdminTokenResponse {
    pub token: String,
}

/// POST /api/admin/login
///
/// Exchanges the fixed administrator credential pair for an admin-scoped
/// token. The comparison is constant-time on the password digest and the
/// failure message is identical for a wrong email and a wrong password.
pub async fn login_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<AdminTokenResponse>, ApiError> {
    verify_admin_credentials(&payload.email, &payload.password, &state.admin)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let token = issue_admin_token(&state.admin.email, &state.jwt_secret, state.token_ttl)
        .map_err(|e| ApiError::internal("token issuance failed", e))?;

    tracing::info!(admin = %state.admin.email, "admin logged in");
    Ok(Json(AdminTokenResponse { token }))
}

/// GET /api/admin/events/:eventId/registrations (admin)
///
/// Registrant identities resolved to display fields only; credential hashes
/// never leave the registry crate.
pub async fn list_attendees_handler(
    Extension(state): Extension<Arc<AppState>>,
    _admin: AdminContext,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<Attendee>>, ApiError> {
    let attendees = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        list_attendees(&conn, &event_id).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    Ok(Json(attendees))
}
