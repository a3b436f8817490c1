//! SQLite-backed repository for trips and places.
//!
//! A [`Store`] is a cheap-to-clone handle over one shared connection. The
//! connection mutex is the serialization point for conflicting writes:
//! concurrent reorders/deletes on the same trip never observe partial state.

mod places;
mod trips;

pub use places::{Place, PlaceInput, PlaceUpdate};
pub use trips::{Trip, TripInput, TripUpdate};

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Repository errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn trip_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Trip", id }
    }

    pub fn place_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Place",
            id,
        }
    }

    /// Whether this is a not-found condition (caller should reconcile).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS trips (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS places (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        trip_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        address TEXT,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        visit_order INTEGER DEFAULT 0,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (trip_id) REFERENCES trips(id) ON DELETE CASCADE
    );
";

/// Shared handle to the trip/place repository.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!(path = %path.display(), "opened trip store");
        Self::init(conn)
    }

    /// Open a fresh in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("itinerary.db");
        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.list_trips().unwrap().is_empty());
    }

    #[test]
    fn cascade_delete_removes_places() {
        let store = Store::open_in_memory().unwrap();
        let trip = store
            .create_trip(TripInput {
                name: "Paris".to_string(),
                description: None,
            })
            .unwrap();
        store
            .create_place(PlaceInput {
                trip_id: trip.id,
                name: "Louvre".to_string(),
                address: None,
                latitude: 48.8606,
                longitude: 2.3376,
            })
            .unwrap();

        assert!(store.delete_trip(trip.id).unwrap());
        assert!(store.list_places(trip.id).unwrap().is_empty());
    }
}
