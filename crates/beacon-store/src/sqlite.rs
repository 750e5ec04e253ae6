//! SQLite implementation of the Storage trait.
//!
//! This is the primary durable backend. It uses rusqlite with bundled SQLite;
//! every slot is one row in the `slots` table.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::key::StoreKey;
use crate::migration;
use crate::traits::{now_millis, SaveOptions, Storage};

/// SQLite-based storage implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Delete every expired slot. Returns the number removed.
    pub fn purge_expired(&self) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM slots WHERE expires_at <= ?1",
                params![now_millis()],
            )?)
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Lock(format!("mutex poisoned: {}", e)))?;
        f(&conn)
    }
}

impl Storage for SqliteStorage {
    fn load(&self, key: &StoreKey) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let row: Option<(String, i64)> = conn
                .query_row(
                    "SELECT value, expires_at FROM slots WHERE key = ?1",
                    params![key.as_str()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match row {
                Some((value, expires_at)) if expires_at > now_millis() => Ok(Some(value)),
                Some(_) => {
                    conn.execute("DELETE FROM slots WHERE key = ?1", params![key.as_str()])?;
                    Ok(None)
                }
                None => Ok(None),
            }
        })
    }

    fn save(&self, key: &StoreKey, value: &str, options: &SaveOptions) -> Result<()> {
        self.with_conn(|conn| {
            let now = now_millis();
            conn.execute(
                "INSERT INTO slots (key, value, path, expires_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    path = excluded.path,
                    expires_at = excluded.expires_at,
                    updated_at = excluded.updated_at",
                params![
                    key.as_str(),
                    value,
                    options.path,
                    options.expires_at(now),
                    now
                ],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &StoreKey) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM slots WHERE key = ?1", params![key.as_str()])?;
            Ok(removed > 0)
        })
    }

    fn keys(&self) -> Result<Vec<StoreKey>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key FROM slots WHERE expires_at > ?1 ORDER BY key")?;
            let keys = stmt
                .query_map(params![now_millis()], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(keys.into_iter().map(StoreKey::new).collect())
        })
    }
}
