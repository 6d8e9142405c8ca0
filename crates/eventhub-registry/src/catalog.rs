//! Administrator-facing event catalog: create, update, delete, plus the
//! public reads. Field edits never touch the attendee relation; deletes
//! remove it wholesale via the cascading foreign key.

use crate::{attendees_for, EventView, RegistryError};
use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parameters for creating a new event. All fields required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventParams {
    pub title: String,
    pub description: String,
    /// Event date, RFC 3339.
    pub date: String,
    pub location: String,
}

/// Parameters for updating an existing event. `None` fields are left
/// untouched; the attendee set is never affected by an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

struct EventRow {
    event_id: String,
    title: String,
    description: String,
    date: String,
    location: String,
    created_at: String,
}

fn map_row_to_event(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        event_id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        location: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const EVENT_COLUMNS: &str = "event_id, title, description, date, location, created_at";

fn validate_date(date: &str) -> Result<(), RegistryError> {
    DateTime::parse_from_rfc3339(date)
        .map(|_| ())
        .map_err(|_| RegistryError::Validation(format!("invalid RFC 3339 date: {date}")))
}

fn view(conn: &Connection, row: EventRow) -> Result<EventView, RegistryError> {
    let attendees = attendees_for(conn, &row.event_id)?;
    Ok(EventView {
        event_id: row.event_id,
        title: row.title,
        description: row.description,
        date: row.date,
        location: row.location,
        created_at: row.created_at,
        attendees,
    })
}

/// True when an event with the given public ID exists.
pub(crate) fn event_exists(conn: &Connection, event_id: &str) -> Result<bool, RegistryError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) > 0 FROM events WHERE event_id = ?1",
        [event_id],
        |row| row.get(0),
    )?)
}

/// Creates a new event with a generated public ID and an empty attendee set.
///
/// # Errors
///
/// Returns [`RegistryError::Validation`] if any field is empty or the date is
/// not RFC 3339.
pub fn create_event(
    conn: &Connection,
    params: &CreateEventParams,
) -> Result<EventView, RegistryError> {
    for (field, value) in [
        ("title", &params.title),
        ("description", &params.description),
        ("date", &params.date),
        ("location", &params.location),
    ] {
        if value.trim().is_empty() {
            return Err(RegistryError::Validation(format!("{field} is required")));
        }
    }
    validate_date(&params.date)?;

    let event_id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO events (event_id, title, description, date, location)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event_id,
            params.title,
            params.description,
            params.date,
            params.location
        ],
    )?;

    get_event(conn, &event_id)
}

/// Retrieves a single event with attendees resolved.
///
/// # Errors
///
/// Returns [`RegistryError::EventNotFound`] if no such event exists.
pub fn get_event(conn: &Connection, event_id: &str) -> Result<EventView, RegistryError> {
    let row = conn
        .query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?1"),
            [event_id],
            map_row_to_event,
        )
        .optional()?
        .ok_or_else(|| RegistryError::EventNotFound(event_id.to_string()))?;

    view(conn, row)
}

/// Lists all events with attendees resolved, newest creation last.
pub fn list_events(conn: &Connection) -> Result<Vec<EventView>, RegistryError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY id ASC"))?;
    let rows = stmt.query_map([], map_row_to_event)?;

    let mut events = Vec::new();
    for row in rows {
        events.push(view(conn, row?)?);
    }
    Ok(events)
}

/// Updates an event's fields using a single atomic UPDATE statement.
///
/// Only fields that are `Some` in `updates` are modified. This avoids the
/// read-modify-write race that would occur if we fetched the event, mutated
/// in memory, and wrote back. An update with no fields set returns the
/// current event unchanged.
///
/// # Errors
///
/// Returns [`RegistryError::EventNotFound`] if no such event exists, or
/// [`RegistryError::Validation`] if a new date is not RFC 3339.
pub fn update_event(
    conn: &Connection,
    event_id: &str,
    updates: &UpdateEventParams,
) -> Result<EventView, RegistryError> {
    if let Some(date) = &updates.date {
        validate_date(date)?;
    }

    let mut set_parts: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let mut idx = 1usize;

    for (column, value) in [
        ("title", &updates.title),
        ("description", &updates.description),
        ("date", &updates.date),
        ("location", &updates.location),
    ] {
        if let Some(v) = value {
            if v.trim().is_empty() {
                return Err(RegistryError::Validation(format!(
                    "{column} must not be empty"
                )));
            }
            set_parts.push(format!("{column} = ?{idx}"));
            values.push(Box::new(v.clone()));
            idx += 1;
        }
    }

    if set_parts.is_empty() {
        return get_event(conn, event_id);
    }

    let sql = format!(
        "UPDATE events SET {} WHERE event_id = ?{idx}",
        set_parts.join(", ")
    );
    values.push(Box::new(event_id.to_string()));

    let params: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let changed = conn.execute(&sql, params.as_slice())?;
    if changed == 0 {
        return Err(RegistryError::EventNotFound(event_id.to_string()));
    }

    get_event(conn, event_id)
}

/// Deletes an event. The cascading foreign key removes the event from every
/// user's registration list in the same statement, so a deleted event can
/// never linger in anyone's registrations.
///
/// # Errors
///
/// Returns [`RegistryError::EventNotFound`] if no such event exists.
pub fn delete_event(conn: &Connection, event_id: &str) -> Result<(), RegistryError> {
    let changed = conn.execute("DELETE FROM events WHERE event_id = ?1", [event_id])?;
    if changed == 0 {
        return Err(RegistryError::EventNotFound(event_id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .expect("should enable foreign keys");
        eventhub_db::run_migrations(&conn).expect("migrations should succeed");
        conn
    }

    fn talk() -> CreateEventParams {
        CreateEventParams {
            title: "Talk".to_string(),
            description: "A talk".to_string(),
            date: "2026-09-01T18:00:00Z".to_string(),
            location: "Hall A".to_string(),
        }
    }

    #[test]
    fn create_returns_event_with_empty_attendees() {
        let conn = setup();
        let event = create_event(&conn, &talk()).expect("should create");

        assert_eq!(event.title, "Talk");
        assert!(event.attendees.is_empty());
        assert!(!event.event_id.is_empty());
    }

    #[test]
    fn missing_fields_are_validation_errors() {
        let conn = setup();
        let mut params = talk();
        params.location = "  ".to_string();

        let err = create_event(&conn, &params).expect_err("blank location should fail");
        assert!(matches!(err, RegistryError::Validation(_)));
    }

    #[test]
    fn bad_date_is_a_validation_error() {
        let conn = setup();
        let mut params = talk();
        params.date = "next tuesday".to_string();

        let err = create_event(&conn, &params).expect_err("bad date should fail");
        assert!(matches!(err, RegistryError::Validation(_)));
    }

    #[test]
    fn update_replaces_only_given_fields() {
        let conn = setup();
        let event = create_event(&conn, &talk()).expect("should create");

        let updated = update_event(
            &conn,
            &event.event_id,
            &UpdateEventParams {
                location: Some("Hall B".to_string()),
                ..Default::default()
            },
        )
        .expect("should update");

        assert_eq!(updated.location, "Hall B");
        assert_eq!(updated.title, "Talk");
        assert_eq!(updated.date, event.date);
    }

    #[test]
    fn update_unknown_event_is_not_found() {
        let conn = setup();
        let err = update_event(
            &conn,
            "missing",
            &UpdateEventParams {
                title: Some("X".to_string()),
                ..Default::default()
            },
        )
        .expect_err("unknown event should fail");
        assert!(matches!(err, RegistryError::EventNotFound(_)));
    }

    #[test]
    fn update_with_no_fields_returns_current_event() {
        let conn = setup();
        let event = create_event(&conn, &talk()).expect("should create");
        let same = update_event(&conn, &event.event_id, &UpdateEventParams::default())
            .expect("empty update should succeed");
        assert_eq!(same, event);
    }

    #[test]
    fn delete_unknown_event_is_not_found() {
        let conn = setup();
        let err = delete_event(&conn, "missing").expect_err("unknown event should fail");
        assert!(matches!(err, RegistryError::EventNotFound(_)));
    }

    #[test]
    fn list_returns_events_in_creation_order() {
        let conn = setup();
        let first = create_event(&conn, &talk()).expect("should create");
        let mut second_params = talk();
        second_params.title = "Workshop".to_string();
        let second = create_event(&conn, &second_params).expect("should create");

        let events = list_events(&conn).expect("should list");
        assert_eq!(
            events.iter().map(|e| &e.event_id).collect::<Vec<_>>(),
            vec![&first.event_id, &second.event_id]
        );
    }
}
