//! User account records.
//!
//! Signup itself lives at the HTTP boundary; this module owns the persisted
//! record. The `password_hash` field is deliberately not serializable; user
//! data leaves the crate through [`crate::Attendee`] or explicit fields only.

use crate::{is_unique_violation, RegistryError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

/// A user account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Internal database ID.
    pub id: i64,
    /// Unique public ID (UUID).
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Hex-encoded SHA-256 password digest. Never plaintext.
    pub password_hash: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

fn map_row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const USER_COLUMNS: &str = "id, user_id, name, email, password_hash, created_at";

/// Creates a new user with a generated public ID.
///
/// # Errors
///
/// Returns [`RegistryError::EmailTaken`] if the email is already in use, or
/// [`RegistryError::Validation`] if a required field is empty.
pub fn create_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, RegistryError> {
    if name.trim().is_empty() {
        return Err(RegistryError::Validation("name is required".to_string()));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(RegistryError::Validation(
            "a valid email is required".to_string(),
        ));
    }

    let user_id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO users (user_id, name, email, password_hash) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, name, email, password_hash],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            RegistryError::EmailTaken
        } else {
            RegistryError::Database(e)
        }
    })?;

    get_user(conn, &user_id)
}

/// Retrieves a user by public ID.
///
/// # Errors
///
/// Returns [`RegistryError::UserNotFound`] if no such user exists.
pub fn get_user(conn: &Connection, user_id: &str) -> Result<User, RegistryError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
        [user_id],
        map_row_to_user,
    )
    .optional()?
    .ok_or_else(|| RegistryError::UserNotFound(user_id.to_string()))
}

/// Looks up a user by email. Returns `None` when no account exists, so the
/// login handler can collapse "unknown email" and "wrong password" into one
/// failure.
pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, RegistryError> {
    Ok(conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            [email],
            map_row_to_user,
        )
        .optional()?)
}
