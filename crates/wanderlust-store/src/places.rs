//! Place CRUD and itinerary ordering.

use crate::{Store, StoreError};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A stored place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub trip_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub visit_order: i64,
    pub created_at: String,
}

/// Fields for creating a place. `visit_order` is assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceInput {
    pub trip_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Partial update; `None` keeps the existing value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn place_from_row(row: &Row<'_>) -> rusqlite::Result<Place> {
    Ok(Place {
        id: row.get("id")?,
        trip_id: row.get("trip_id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        visit_order: row.get("visit_order")?,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    /// Places of one trip in itinerary order.
    pub fn list_places(&self, trip_id: i64) -> Result<Vec<Place>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT * FROM places WHERE trip_id = ?1 ORDER BY visit_order ASC, created_at ASC",
        )?;
        let places = stmt
            .query_map(params![trip_id], place_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(places)
    }

    /// Look up one place.
    pub fn get_place(&self, id: i64) -> Result<Option<Place>, StoreError> {
        let conn = self.conn();
        let place = conn
            .query_row(
                "SELECT * FROM places WHERE id = ?1",
                params![id],
                place_from_row,
            )
            .optional()?;
        Ok(place)
    }

    /// Append a place to its trip's itinerary (`max(visit_order) + 1`).
    ///
    /// Fails with [`StoreError::NotFound`] when the trip does not exist.
    pub fn create_place(&self, input: PlaceInput) -> Result<Place, StoreError> {
        let conn = self.conn();
        let trip_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE id = ?1)",
            params![input.trip_id],
            |row| row.get(0),
        )?;
        if !trip_exists {
            return Err(StoreError::trip_not_found(input.trip_id));
        }

        let next_order: i64 = conn.query_row(
            "SELECT COALESCE(MAX(visit_order), -1) + 1 FROM places WHERE trip_id = ?1",
            params![input.trip_id],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO places (trip_id, name, address, latitude, longitude, visit_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                input.trip_id,
                input.name,
                input.address,
                input.latitude,
                input.longitude,
                next_order
            ],
        )?;
        let id = conn.last_insert_rowid();
        let place = conn.query_row(
            "SELECT * FROM places WHERE id = ?1",
            params![id],
            place_from_row,
        )?;
        tracing::debug!(place_id = place.id, trip_id = place.trip_id, "created place");
        Ok(place)
    }

    /// Update the fields present in `input`; `None` means not found.
    pub fn update_place(&self, id: i64, input: PlaceUpdate) -> Result<Option<Place>, StoreError> {
        let conn = self.conn();
        let Some(existing) = conn
            .query_row(
                "SELECT * FROM places WHERE id = ?1",
                params![id],
                place_from_row,
            )
            .optional()?
        else {
            return Ok(None);
        };

        let name = input.name.unwrap_or(existing.name);
        let address = input.address.or(existing.address);
        let latitude = input.latitude.unwrap_or(existing.latitude);
        let longitude = input.longitude.unwrap_or(existing.longitude);
        conn.execute(
            "UPDATE places SET name = ?1, address = ?2, latitude = ?3, longitude = ?4
             WHERE id = ?5",
            params![name, address, latitude, longitude, id],
        )?;
        let place = conn.query_row(
            "SELECT * FROM places WHERE id = ?1",
            params![id],
            place_from_row,
        )?;
        Ok(Some(place))
    }

    /// Delete a place. Returns whether a row was removed.
    pub fn delete_place(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn();
        let changed = conn.execute("DELETE FROM places WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Replace the itinerary order of a trip: `visit_order = index` for each
    /// id in `place_ids`.
    ///
    /// `place_ids` must be exactly a permutation of the trip's current place
    /// ids; the whole assignment runs in one transaction, so a rejected call
    /// leaves every `visit_order` untouched.
    pub fn reorder_places(&self, trip_id: i64, place_ids: &[i64]) -> Result<(), StoreError> {
        let mut conn = self.conn();

        let trip_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE id = ?1)",
            params![trip_id],
            |row| row.get(0),
        )?;
        if !trip_exists {
            return Err(StoreError::trip_not_found(trip_id));
        }

        let current: HashSet<i64> = {
            let mut stmt = conn.prepare("SELECT id FROM places WHERE trip_id = ?1")?;
            stmt.query_map(params![trip_id], |row| row.get(0))?
                .collect::<rusqlite::Result<HashSet<_>>>()?
        };

        let mut seen = HashSet::new();
        for &id in place_ids {
            if !current.contains(&id) {
                return Err(StoreError::Invalid(format!(
                    "Place {id} not in trip {trip_id}"
                )));
            }
            if !seen.insert(id) {
                return Err(StoreError::Invalid(format!(
                    "Place {id} appears more than once"
                )));
            }
        }
        if seen.len() != current.len() {
            return Err(StoreError::Invalid(format!(
                "placeIds must contain each place in trip {trip_id} exactly once"
            )));
        }

        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("UPDATE places SET visit_order = ?1 WHERE id = ?2 AND trip_id = ?3")?;
            for (index, &id) in place_ids.iter().enumerate() {
                stmt.execute(params![index as i64, id, trip_id])?;
            }
        }
        tx.commit()?;
        tracing::debug!(trip_id, count = place_ids.len(), "reordered places");
        Ok(())
    }
}
