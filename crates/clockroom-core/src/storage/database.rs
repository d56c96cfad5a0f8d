//! SQLite-backed key/value storage.
//!
//! Provides two tables in `~/.config/clockroom/clockroom.db`:
//! - `preferences`: durable per-profile settings
//! - `navigation`: handoff data that lives until the session is closed

use std::rc::Rc;

use rusqlite::{params, Connection};

use super::{data_dir, KvStore};
use crate::error::StorageError;

const PREFERENCES_TABLE: &str = "preferences";
const NAVIGATION_TABLE: &str = "navigation";

/// SQLite database holding both stores.
pub struct Database {
    conn: Rc<Connection>,
}

impl Database {
    /// Open the database at `~/.config/clockroom/clockroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?
            .join("clockroom.db");
        Self::open_path(&path)
    }

    /// Open a database file at an explicit path.
    pub fn open_path(path: &std::path::Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn: Rc::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Rc::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS preferences (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS navigation (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Durable preference store.
    pub fn preferences(&self) -> SqliteKv {
        SqliteKv {
            conn: Rc::clone(&self.conn),
            table: PREFERENCES_TABLE,
        }
    }

    /// Navigation-scoped store, emptied by [`Database::clear_navigation`].
    pub fn navigation(&self) -> SqliteKv {
        SqliteKv {
            conn: Rc::clone(&self.conn),
            table: NAVIGATION_TABLE,
        }
    }

    /// Equivalent of closing the tab: drops all navigation-scoped data.
    pub fn clear_navigation(&self) -> Result<usize, StorageError> {
        Ok(self.conn.execute("DELETE FROM navigation", [])?)
    }
}

/// One table of the database seen as a [`KvStore`].
pub struct SqliteKv {
    conn: Rc<Connection>,
    table: &'static str,
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT value FROM {} WHERE key = ?1", self.table))?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            &format!("INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)", self.table),
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn.execute(
            &format!("DELETE FROM {} WHERE key = ?1", self.table),
            params![key],
        )?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT key FROM {} ORDER BY key", self.table))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        let mut prefs = db.preferences();
        assert!(prefs.get("test").unwrap().is_none());
        prefs.set("test", "hello").unwrap();
        assert_eq!(prefs.get("test").unwrap().unwrap(), "hello");
        prefs.set("test", "again").unwrap();
        assert_eq!(prefs.keys().unwrap(), vec!["test".to_string()]);
        prefs.remove("test").unwrap();
        assert!(prefs.get("test").unwrap().is_none());
    }

    #[test]
    fn tables_are_independent() {
        let db = Database::open_memory().unwrap();
        let mut prefs = db.preferences();
        let mut nav = db.navigation();
        prefs.set("k", "durable").unwrap();
        nav.set("k", "ephemeral").unwrap();

        assert_eq!(db.clear_navigation().unwrap(), 1);
        assert!(nav.get("k").unwrap().is_none());
        assert_eq!(prefs.get("k").unwrap().as_deref(), Some("durable"));
    }

    #[test]
    fn survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clockroom.db");
        {
            let db = Database::open_path(&path).unwrap();
            db.preferences().set("clock-sound-id", "\"chime\"").unwrap();
        }
        let db = Database::open_path(&path).unwrap();
        assert_eq!(
            db.preferences().get("clock-sound-id").unwrap().as_deref(),
            Some("\"chime\"")
        );
    }
}
