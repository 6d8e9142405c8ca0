//! EventHub server library logic.
//!
//! Visitors browse events, authenticated users register and unregister for
//! them, and a single configured administrator manages the catalog and
//! inspects registrant lists. Identity is carried by signed, expiring bearer
//! tokens with two independent classes (user and admin).

pub mod api_admin;
pub mod api_auth;
pub mod api_events;
pub mod api_users;
pub mod config;
pub mod error;
pub mod middleware;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use eventhub_auth::AdminCredentials;
use eventhub_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state shared across all request handlers.
///
/// Loaded once at startup from configuration and immutable thereafter; the
/// admin credential pair and signing secret are injected here, never
/// compiled in.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// The fixed administrator credential pair.
    pub admin: AdminCredentials,
}

/// Maximum request body size (2 MiB). Every request body on this API is a
/// small JSON record; this is a generous outer bound.
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
///
/// Public reads and the two credential exchanges take no gate; mutating
/// routes take the user or admin identity gate as a handler extractor, so
/// rejection happens before any domain logic runs.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/signup", post(api_auth::signup_handler))
        .route("/api/auth/login", post(api_auth::login_handler))
        .route("/api/admin/login", post(api_admin::login_handler))
        .route(
            "/api/events",
            get(api_events::list_events_handler).post(api_events::create_event_handler),
        )
        .route(
            "/api/events/{eventId}",
            get(api_events::get_event_handler)
                .put(api_events::update_event_handler)
                .delete(api_events::delete_event_handler),
        )
        .route(
            "/api/events/{eventId}/register",
            post(api_events::register_handler),
        )
        .route(
            "/api/events/{eventId}/unregister",
            post(api_events::unregister_handler),
        )
        .route(
            "/api/users/registrations",
            get(api_users::list_registrations_handler),
        )
        .route(
            "/api/admin/events/{eventId}/registrations",
            get(api_admin::list_attendees_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
