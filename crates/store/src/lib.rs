//! `panelconf-store` - SQLite adapter for the persistent option store.
//!
//! One `options` table of JSON-serialized values. Single-key atomicity
//! comes from SQLite row updates; the engine never asks for cross-key
//! transactions.

use std::path::Path;

use rusqlite::{params, Connection};
use serde_json::Value;

use panelconf_engine::{PersistentStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS options (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given path. Schema creation is
    /// idempotent.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;
        conn.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self { conn })
    }

    /// In-memory store, mainly for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        conn.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self { conn })
    }
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl PersistentStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let result = self.conn.query_row(
            "SELECT value FROM options WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StoreError::Backend(format!("corrupt value for '{key}': {e}"))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(backend(e)),
        }
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.conn
            .execute(
                "INSERT INTO options (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, json],
            )
            .map_err(backend)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM options WHERE key = ?1", params![key])
            .map_err(backend)?;
        Ok(())
    }
}
