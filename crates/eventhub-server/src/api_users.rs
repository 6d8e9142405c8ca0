//! User-facing registration views.

use crate::error::ApiError;
use crate::middleware::UserContext;
use crate::AppState;
use axum::{extract::Extension, response::Json};
use eventhub_registry::{list_registrations, EventView};
use std::sync::Arc;

/// GET /api/users/registrations (user)
///
/// The events the caller is registered for, in registration order. A user
/// with no registrations gets an empty list.
pub async fn list_registrations_handler(
    Extension(state): Extension<Arc<AppState>>,
    user: UserContext,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let events = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        list_registrations(&conn, &user.user_id).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    Ok(Json(events))
}
