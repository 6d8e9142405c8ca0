//! The API error boundary.
//!
//! Domain crates return typed errors; this module maps each to a stable
//! HTTP status and a `{"error": message}` body. Store errors are logged
//! server-side and surfaced as a generic 500, never verbatim.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use eventhub_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, or expired token (distinct from `Forbidden`).
    #[error("{0}")]
    Unauthorized(String),
    /// Valid token lacking the required role.
    #[error("{0}")]
    Forbidden(String),
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    /// Internal error from a pool/join failure, with context for the log.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        Self::InternalServerError(format!("{context}: {err}"))
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::EventNotFound(_) | RegistryError::UserNotFound(_) => {
                Self::NotFound(e.to_string())
            }
            RegistryError::AlreadyRegistered | RegistryError::EmailTaken => {
                Self::Conflict(e.to_string())
            }
            RegistryError::Validation(msg) => Self::BadRequest(msg),
            RegistryError::Database(err) => {
                Self::InternalServerError(format!("registry database error: {err}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(detail) => {
                // The detail stays in the log; the caller gets a generic line.
                tracing::error!(error = %detail, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_map_to_expected_variants() {
        assert!(matches!(
            ApiError::from(RegistryError::EventNotFound("e".to_string())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(RegistryError::AlreadyRegistered),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(RegistryError::EmailTaken),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(RegistryError::Validation("x".to_string())),
            ApiError::BadRequest(_)
        ));
    }
}
