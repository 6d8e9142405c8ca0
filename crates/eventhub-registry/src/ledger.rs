//! The registration ledger: register, unregister, and the two derived views
//! of the membership relation.
//!
//! Register and unregister are deliberately asymmetric in idempotency:
//! registering twice is a meaningful user error and is rejected with
//! [`RegistryError::AlreadyRegistered`], while unregistering twice is a
//! harmless no-op (set-insert vs. set-discard semantics).

use crate::catalog::{event_exists, get_event};
use crate::users::get_user;
use crate::{attendees_for, is_unique_violation, Attendee, EventView, RegistryError};
use rusqlite::{params, Connection};

/// Registers a user for an event and returns the updated event view.
///
/// The membership relation lives in a single join table, so this is one
/// atomic INSERT; there is no partially-updated state to present on
/// failure.
///
/// # Errors
///
/// - [`RegistryError::EventNotFound`] if the event id is unknown.
/// - [`RegistryError::UserNotFound`] if the user id is unknown.
/// - [`RegistryError::AlreadyRegistered`] if the user is already an
///   attendee; the state is unchanged.
pub fn register(
    conn: &Connection,
    user_id: &str,
    event_id: &str,
) -> Result<EventView, RegistryError> {
    if !event_exists(conn, event_id)? {
        return Err(RegistryError::EventNotFound(event_id.to_string()));
    }
    // The gate verified the token, not the account; the user row may have
    // been removed since the token was issued.
    get_user(conn, user_id)?;

    conn.execute(
        "INSERT INTO registrations (user_id, event_id) VALUES (?1, ?2)",
        params![user_id, event_id],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            RegistryError::AlreadyRegistered
        } else {
            RegistryError::Database(e)
        }
    })?;

    get_event(conn, event_id)
}

/// Removes a user from an event and returns the updated event view.
///
/// Idempotent: if the user is not currently an attendee the call is a no-op
/// success.
///
/// # Errors
///
/// Returns [`RegistryError::EventNotFound`] if the event id is unknown.
pub fn unregister(
    conn: &Connection,
    user_id: &str,
    event_id: &str,
) -> Result<EventView, RegistryError> {
    if !event_exists(conn, event_id)? {
        return Err(RegistryError::EventNotFound(event_id.to_string()));
    }

    conn.execute(
        "DELETE FROM registrations WHERE user_id = ?1 AND event_id = ?2",
        params![user_id, event_id],
    )?;

    get_event(conn, event_id)
}

/// True when the user is currently registered for the event.
pub fn is_registered(
    conn: &Connection,
    user_id: &str,
    event_id: &str,
) -> Result<bool, RegistryError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) > 0 FROM registrations WHERE user_id = ?1 AND event_id = ?2",
        params![user_id, event_id],
        |row| row.get(0),
    )?)
}

/// Lists the events a user is registered for, in registration order.
///
/// A user with no registrations gets an empty list, never an error.
pub fn list_registrations(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<EventView>, RegistryError> {
    let mut stmt = conn.prepare(
        "SELECT e.event_id
         FROM registrations r
         JOIN events e ON e.event_id = r.event_id
         WHERE r.user_id = ?1
         ORDER BY r.id ASC",
    )?;

    let rows = stmt.query_map([user_id], |row| row.get::<_, String>(0))?;
    let mut events = Vec::new();
    for row in rows {
        events.push(get_event(conn, &row?)?);
    }
    Ok(events)
}

/// Lists the attendees of an event, resolved to display fields.
///
/// # Errors
///
/// Returns [`RegistryError::EventNotFound`] if the event id is unknown.
pub fn list_attendees(conn: &Connection, event_id: &str) -> Result<Vec<Attendee>, RegistryError> {
    if !event_exists(conn, event_id)? {
        return Err(RegistryError::EventNotFound(event_id.to_string()));
    }
    attendees_for(conn, event_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{create_event, delete_event, CreateEventParams};
    use crate::users::create_user;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .expect("should enable foreign keys");
        eventhub_db::run_migrations(&conn).expect("migrations should succeed");
        conn
    }

    fn seed_event(conn: &Connection, title: &str) -> String {
        create_event(
            conn,
            &CreateEventParams {
                title: title.to_string(),
                description: "desc".to_string(),
                date: "2026-09-01T18:00:00Z".to_string(),
                location: "Hall A".to_string(),
            },
        )
        .expect("should create event")
        .event_id
    }

    fn seed_user(conn: &Connection, name: &str, email: &str) -> String {
        create_user(conn, name, email, "hash")
            .expect("should create user")
            .user_id
    }

    #[test]
    fn register_appears_on_both_sides() {
        let conn = setup();
        let event_id = seed_event(&conn, "Talk");
        let user_id = seed_user(&conn, "Alice", "alice@example.com");

        assert!(!is_registered(&conn, &user_id, &event_id).expect("should query"));

        let view = register(&conn, &user_id, &event_id).expect("should register");
        assert_eq!(view.attendees.len(), 1);
        assert_eq!(view.attendees[0].user_id, user_id);
        assert!(is_registered(&conn, &user_id, &event_id).expect("should query"));

        let registrations = list_registrations(&conn, &user_id).expect("should list");
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].event_id, event_id);

        let attendees = list_attendees(&conn, &event_id).expect("should list attendees");
        assert_eq!(attendees[0].email, "alice@example.com");
    }

    #[test]
    fn double_register_is_a_conflict_with_state_unchanged() {
        let conn = setup();
        let event_id = seed_event(&conn, "Talk");
        let user_id = seed_user(&conn, "Alice", "alice@example.com");

        register(&conn, &user_id, &event_id).expect("first should succeed");
        let err = register(&conn, &user_id, &event_id).expect_err("second should fail");
        assert!(matches!(err, RegistryError::AlreadyRegistered));

        let attendees = list_attendees(&conn, &event_id).expect("should list attendees");
        assert_eq!(attendees.len(), 1, "second call must not change state");
    }

    #[test]
    fn double_unregister_is_a_no_op() {
        let conn = setup();
        let event_id = seed_event(&conn, "Talk");
        let user_id = seed_user(&conn, "Alice", "alice@example.com");

        register(&conn, &user_id, &event_id).expect("should register");
        let first = unregister(&conn, &user_id, &event_id).expect("first should succeed");
        assert!(first.attendees.is_empty());

        let second = unregister(&conn, &user_id, &event_id).expect("second should succeed");
        assert!(second.attendees.is_empty());
        assert!(!is_registered(&conn, &user_id, &event_id).expect("should query"));
    }

    #[test]
    fn unknown_event_is_not_found_for_both_operations() {
        let conn = setup();
        let user_id = seed_user(&conn, "Alice", "alice@example.com");

        assert!(matches!(
            register(&conn, &user_id, "missing"),
            Err(RegistryError::EventNotFound(_))
        ));
        assert!(matches!(
            unregister(&conn, &user_id, "missing"),
            Err(RegistryError::EventNotFound(_))
        ));
        assert!(matches!(
            list_attendees(&conn, "missing"),
            Err(RegistryError::EventNotFound(_))
        ));
    }

    #[test]
    fn unknown_user_cannot_register() {
        let conn = setup();
        let event_id = seed_event(&conn, "Talk");

        assert!(matches!(
            register(&conn, "ghost", &event_id),
            Err(RegistryError::UserNotFound(_))
        ));
    }

    #[test]
    fn attendees_are_in_registration_order() {
        let conn = setup();
        let event_id = seed_event(&conn, "Talk");
        let alice = seed_user(&conn, "Alice", "alice@example.com");
        let bob = seed_user(&conn, "Bob", "bob@example.com");

        register(&conn, &alice, &event_id).expect("alice registers");
        let view = register(&conn, &bob, &event_id).expect("bob registers");

        assert_eq!(
            view.attendees.iter().map(|a| &a.user_id).collect::<Vec<_>>(),
            vec![&alice, &bob]
        );
    }

    #[test]
    fn deleting_event_removes_it_from_every_registration_list() {
        let conn = setup();
        let event_id = seed_event(&conn, "Talk");
        let kept_id = seed_event(&conn, "Workshop");
        let alice = seed_user(&conn, "Alice", "alice@example.com");
        let bob = seed_user(&conn, "Bob", "bob@example.com");

        register(&conn, &alice, &event_id).expect("alice registers");
        register(&conn, &bob, &event_id).expect("bob registers");
        register(&conn, &alice, &kept_id).expect("alice registers for workshop");

        delete_event(&conn, &event_id).expect("should delete");

        let alice_events = list_registrations(&conn, &alice).expect("should list");
        assert_eq!(alice_events.len(), 1);
        assert_eq!(alice_events[0].event_id, kept_id);

        let bob_events = list_registrations(&conn, &bob).expect("should list");
        assert!(bob_events.is_empty());
    }

    #[test]
    fn no_registrations_is_an_empty_list() {
        let conn = setup();
        let user_id = seed_user(&conn, "Alice", "alice@example.com");
        let events = list_registrations(&conn, &user_id).expect("should list");
        assert!(events.is_empty());
    }
}
