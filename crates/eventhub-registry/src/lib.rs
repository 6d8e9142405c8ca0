//! Event catalog and registration ledger for the EventHub platform.
//!
//! Owns the many-to-many membership relation between users and events. The
//! relation is stored once, in the `registrations` join table; the attendee
//! list of an event and the registration list of a user are both derived
//! reads over it, so the two sides can never disagree and every membership
//! mutation is a single atomic statement.
//!
//! All functions are synchronous and take a `&rusqlite::Connection`; callers
//! in async context run them on a blocking task with a pooled connection.

mod catalog;
mod ledger;
mod users;

pub use catalog::{
    create_event, delete_event, get_event, list_events, update_event, CreateEventParams,
    UpdateEventParams,
};
pub use ledger::{is_registered, list_attendees, list_registrations, register, unregister};
pub use users::{create_user, find_user_by_email, get_user, User};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during catalog or ledger operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("event not found: {0}")]
    EventNotFound(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("already registered")]
    AlreadyRegistered,
    #[error("email already in use")]
    EmailTaken,
    #[error("invalid field: {0}")]
    Validation(String),
}

/// An attendee of an event, resolved to display fields only. Credential
/// hashes are never exposed through this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attendee {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// An event record with its attendee list resolved, as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventView {
    /// Unique public ID for the event (UUID).
    pub event_id: String,
    pub title: String,
    pub description: String,
    /// Event date, RFC 3339.
    pub date: String,
    pub location: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Registered attendees, in registration order.
    pub attendees: Vec<Attendee>,
}

/// True when the error is a SQLite UNIQUE constraint violation.
///
/// Checks the extended result code, not the generic constraint class: a
/// FOREIGN KEY or NOT NULL violation must not be mistaken for a duplicate
/// row.
pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Resolves the attendee list of an event, in registration order.
pub(crate) fn attendees_for(
    conn: &Connection,
    event_id: &str,
) -> Result<Vec<Attendee>, RegistryError> {
    let mut stmt = conn.prepare(
        "SELECT u.user_id, u.name, u.email
         FROM registrations r
         JOIN users u ON u.user_id = r.user_id
         WHERE r.event_id = ?1
         ORDER BY r.id ASC",
    )?;

    let rows = stmt.query_map([event_id], |row| {
        Ok(Attendee {
            user_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
        })
    })?;

    let mut attendees = Vec::new();
    for row in rows {
        attendees.push(row?);
    }
    Ok(attendees)
}
