//! Event catalog and registration handlers.
//!
//! Reads are public; catalog mutations require the admin gate and
//! registration mutations require the user gate. All database work runs on
//! the blocking pool with a pooled connection.

use crate::error::ApiError;
use crate::middleware::{AdminContext, UserContext};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use eventhub_registry::{
    create_event, delete_event, get_event, list_events, register, unregister, update_event,
    CreateEventParams, EventView, UpdateEventParams,
};
use serde_json::json;
use std::sync::Arc;

/// Maximum length for an event title or location.
const MAX_FIELD_LEN: usize = 256;
/// Maximum length for an event description.
const MAX_DESCRIPTION_LEN: usize = 4096;

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.len() > max {
        return Err(ApiError::BadRequest(format!(
            "{field} exceeds {max} bytes"
        )));
    }
    Ok(())
}

/// GET /api/events
pub async fn list_events_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let events = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        list_events(&conn).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    Ok(Json(events))
}

/// GET /api/events/:eventId
pub async fn get_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventView>, ApiError> {
    let event = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        get_event(&conn, &event_id).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    Ok(Json(event))
}

/// POST /api/events (admin)
pub async fn create_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    admin: AdminContext,
    Json(payload): Json<CreateEventParams>,
) -> Result<(StatusCode, Json<EventView>), ApiError> {
    check_len("title", &payload.title, MAX_FIELD_LEN)?;
    check_len("location", &payload.location, MAX_FIELD_LEN)?;
    check_len("description", &payload.description, MAX_DESCRIPTION_LEN)?;

    let event = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        create_event(&conn, &payload).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    tracing::info!(event_id = %event.event_id, admin = %admin.email, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/:eventId (admin)
pub async fn update_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    admin: AdminContext,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventParams>,
) -> Result<Json<EventView>, ApiError> {
    if let Some(title) = &payload.title {
        check_len("title", title, MAX_FIELD_LEN)?;
    }
    if let Some(location) = &payload.location {
        check_len("location", location, MAX_FIELD_LEN)?;
    }
    if let Some(description) = &payload.description {
        check_len("description", description, MAX_DESCRIPTION_LEN)?;
    }

    let id = event_id.clone();
    let event = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        update_event(&conn, &id, &payload).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    tracing::info!(event_id = %event_id, admin = %admin.email, "event updated");
    Ok(Json(event))
}

/// DELETE /api/events/:eventId (admin)
///
/// The cascading delete also removes the event from every user's
/// registration list.
pub async fn delete_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    admin: AdminContext,
    Path(event_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = event_id.clone();
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        delete_event(&conn, &id).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    tracing::info!(event_id = %event_id, admin = %admin.email, "event deleted");
    Ok(Json(json!({ "message": "event deleted" })))
}

/// POST /api/events/:eventId/register (user)
pub async fn register_handler(
    Extension(state): Extension<Arc<AppState>>,
    user: UserContext,
    Path(event_id): Path<String>,
) -> Result<Json<EventView>, ApiError> {
    let event = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        register(&conn, &user.user_id, &event_id).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    Ok(Json(event))
}

/// POST /api/events/:eventId/unregister (user)
pub async fn unregister_handler(
    Extension(state): Extension<Arc<AppState>>,
    user: UserContext,
    Path(event_id): Path<String>,
) -> Result<Json<EventView>, ApiError> {
    let event = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::internal("db connection failed", e))?;
        unregister(&conn, &user.user_id, &event_id).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal("task join error", e))??;

    Ok(Json(event))
}
