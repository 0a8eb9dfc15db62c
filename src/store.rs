//! Local key-value persistence.
//!
//! Holds the auth token, reader settings and search history. Values are
//! JSON text; there is no schema versioning.

use crate::error::Result;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Key of the bearer token.
pub const TOKEN_KEY: &str = "userToken";
/// Key of the reader display settings.
pub const READER_SETTINGS_KEY: &str = "@reader_settings";
/// Key of the recent search list.
pub const SEARCH_HISTORY_KEY: &str = "searchHistory";

/// SQLite-backed key-value store, cheap to clone.
#[derive(Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStore {
    /// Open or create the store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Raw string value.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store a raw string value.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Remove a key. Returns whether it existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let rows = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }

    /// Decode a JSON value.
    ///
    /// A value that no longer parses is logged and treated as missing.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable stored value");
                Ok(None)
            }
        }
    }

    /// Encode and store a JSON value.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }

    /// Stored bearer token.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.get_raw(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    /// Persist the bearer token.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.set_raw(TOKEN_KEY, token)
    }

    /// Forget the bearer token.
    pub fn clear_token(&self) -> Result<()> {
        self.remove(TOKEN_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_roundtrip_and_overwrite() {
        let store = LocalStore::open_memory().unwrap();
        assert!(store.get_raw("k").unwrap().is_none());

        store.set_raw("k", "one").unwrap();
        store.set_raw("k", "two").unwrap();
        assert_eq!(store.get_raw("k").unwrap().as_deref(), Some("two"));

        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
    }

    #[test]
    fn test_unreadable_json_is_missing() {
        let store = LocalStore::open_memory().unwrap();
        store.set_raw(SEARCH_HISTORY_KEY, "{not json").unwrap();

        let value: Option<Vec<String>> = store.get_json(SEARCH_HISTORY_KEY).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_token_lifecycle() {
        let store = LocalStore::open_memory().unwrap();
        assert!(store.token().unwrap().is_none());

        store.set_token("abc").unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("abc"));

        store.clear_token().unwrap();
        assert!(store.token().unwrap().is_none());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.db");

        {
            let store = LocalStore::open(&path).unwrap();
            store.set_token("persisted").unwrap();
        }

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("persisted"));
    }
}
