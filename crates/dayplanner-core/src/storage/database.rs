//! SQLite-backed key-value store.
//!
//! Stands in for browser local storage: every value is a string under a
//! string key, and the task collection for a user is a single JSON array
//! under `tasks:<user>`.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::warn;

use super::data_dir;
use super::task_store::TaskStore;
use crate::error::{Result, StorageError};
use crate::task::Task;

/// SQLite database holding the kv table.
pub struct Database {
    conn: Connection,
}

fn tasks_key(user: &str) -> String {
    format!("tasks:{user}")
}

impl Database {
    /// Open the database at `~/.config/dayplanner/dayplanner.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("dayplanner.db");
        Self::open_at(path)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key. Returns whether it existed.
    pub fn kv_delete(&self, key: &str) -> Result<bool, rusqlite::Error> {
        let n = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }
}

impl TaskStore for Database {
    /// A value that no longer parses is logged and read as an empty list.
    fn load(&self, user: &str) -> Result<Vec<Task>> {
        let key = tasks_key(user);
        let Some(raw) = self.kv_get(&key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => Ok(tasks),
            Err(e) => {
                warn!(%key, error = %e, "stored task list is unreadable; starting empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, user: &str, tasks: &[Task]) -> Result<()> {
        let raw = serde_json::to_string(tasks)?;
        self.kv_set(&tasks_key(user), &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskUpdate;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        assert!(db.kv_delete("test").unwrap());
        assert!(!db.kv_delete("test").unwrap());
    }

    #[test]
    fn tasks_are_stored_per_user() {
        let mut db = Database::open_memory().unwrap();
        db.save("alice", &[Task::new("a1").with_id("a1")]).unwrap();
        db.save("bob", &[Task::new("b1"), Task::new("b2")]).unwrap();

        assert_eq!(db.load("alice").unwrap().len(), 1);
        assert_eq!(db.load("bob").unwrap().len(), 2);
        assert!(db.load("carol").unwrap().is_empty());

        let raw = db.kv_get("tasks:alice").unwrap().unwrap();
        assert!(raw.contains("\"plannedDuration\":30"));
    }

    #[test]
    fn corrupt_value_reads_as_empty() {
        let db = Database::open_memory().unwrap();
        db.kv_set("tasks:default", "{not json").unwrap();
        assert!(db.load("default").unwrap().is_empty());
    }

    #[test]
    fn update_by_id_round_trips_through_sqlite() {
        let mut db = Database::open_memory().unwrap();
        db.save("default", &[Task::new("x").with_id("x")]).unwrap();
        let updated = db
            .update_by_id("default", "x", &TaskUpdate::schedule_at(14, 0))
            .unwrap();
        assert_eq!(updated.planned_start_time.as_deref(), Some("14:00"));
        assert_eq!(db.load("default").unwrap()[0], updated);
    }

    #[test]
    fn file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.db");
        {
            let mut db = Database::open_at(&path).unwrap();
            db.save("default", &[Task::new("keep").with_id("keep")]).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.load("default").unwrap()[0].id, "keep");
    }
}
