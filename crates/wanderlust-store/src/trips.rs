//! Trip CRUD.

use crate::{Store, StoreError};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A stored trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Fields for creating a trip.
#[derive(Debug, Clone, Deserialize)]
pub struct TripInput {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update; `None` keeps the existing value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn trip_from_row(row: &Row<'_>) -> rusqlite::Result<Trip> {
    Ok(Trip {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    /// All trips, newest first.
    pub fn list_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT * FROM trips ORDER BY created_at DESC, id DESC")?;
        let trips = stmt
            .query_map([], trip_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(trips)
    }

    /// Look up one trip.
    pub fn get_trip(&self, id: i64) -> Result<Option<Trip>, StoreError> {
        let conn = self.conn();
        let trip = conn
            .query_row("SELECT * FROM trips WHERE id = ?1", params![id], trip_from_row)
            .optional()?;
        Ok(trip)
    }

    /// Create a trip and return the stored row.
    pub fn create_trip(&self, input: TripInput) -> Result<Trip, StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO trips (name, description) VALUES (?1, ?2)",
            params![input.name, input.description],
        )?;
        let id = conn.last_insert_rowid();
        let trip = conn.query_row("SELECT * FROM trips WHERE id = ?1", params![id], trip_from_row)?;
        tracing::debug!(trip_id = trip.id, name = %trip.name, "created trip");
        Ok(trip)
    }

    /// Update the fields present in `input`; `None` means not found.
    pub fn update_trip(&self, id: i64, input: TripUpdate) -> Result<Option<Trip>, StoreError> {
        let conn = self.conn();
        let Some(existing) = conn
            .query_row("SELECT * FROM trips WHERE id = ?1", params![id], trip_from_row)
            .optional()?
        else {
            return Ok(None);
        };

        let name = input.name.unwrap_or(existing.name);
        let description = input.description.or(existing.description);
        conn.execute(
            "UPDATE trips SET name = ?1, description = ?2 WHERE id = ?3",
            params![name, description, id],
        )?;
        let trip = conn.query_row("SELECT * FROM trips WHERE id = ?1", params![id], trip_from_row)?;
        Ok(Some(trip))
    }

    /// Delete a trip (places cascade). Returns whether a row was removed.
    pub fn delete_trip(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn();
        let changed = conn.execute("DELETE FROM trips WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
