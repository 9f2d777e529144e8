use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

use crate::app_dirs::AppDirs;
use crate::error::StoreError;

pub const LEADERBOARD_KEY: &str = "harf.leaderboard";
pub const PLAYER_NAME_KEY: &str = "harf.player_name";
pub const TIER_KEY: &str = "harf.tier";
pub const DURATION_KEY: &str = "harf.duration";

/// String key-value store for leaderboard and preferences
pub trait Storage {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read and decode `key`, falling back to `default` on any failure.
pub fn load_or<T: DeserializeOwned>(store: &dyn Storage, key: &str, default: T) -> T {
    let raw = match store.get_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            log::warn!("error reading `{key}` from storage: {e}");
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("error decoding `{key}` from storage: {e}");
            default
        }
    }
}

/// Encode and write `value`. Failures are logged and the write is dropped.
pub fn save<T: Serialize + ?Sized>(store: &dyn Storage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StoreError::from)
        .and_then(|raw| store.set_raw(key, &raw));

    if let Err(e) = result {
        log::warn!("error writing `{key}` to storage: {e}");
    }
}

/// SQLite-backed store with a single `kv` table
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at the default state directory.
    pub fn new() -> Result<Self, StoreError> {
        let path = AppDirs::db_path().unwrap_or_else(|| "harf.db".into());
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

/// Volatile store, used when the database cannot be opened and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
