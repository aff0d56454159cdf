//! Database connection and collection operations.

use crate::{migrations, Collection, DatabaseResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Number of entries in each collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub processed_messages: usize,
    pub processed_submissions: usize,
    pub subscribers: usize,
}

/// Durable store for the bot's three collections.
pub struct Database {
    conn: Connection,
    path: Option<String>,
}

impl Database {
    /// Open a database at the given path, running migrations if needed.
    pub fn open(path: &Path) -> DatabaseResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        migrations::run_migrations(&conn)?;

        let path_str = path.to_string_lossy().to_string();
        info!(path = %path_str, "Database opened");

        Ok(Self {
            conn,
            path: Some(path_str),
        })
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA temp_store = MEMORY;")?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Path of the backing file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    // ==========================================
    // Whole-collection access
    // ==========================================

    /// All values of `collection` in insertion order. Empty when nothing
    /// has been stored yet.
    pub fn get(&self, collection: Collection) -> DatabaseResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT value FROM collection_entries WHERE collection = ?1 ORDER BY seq ASC",
        )?;

        let values = stmt
            .query_map(params![collection.as_str()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(values)
    }

    /// Replace the whole collection with `values`, keeping their order.
    ///
    /// Runs in one transaction. Repeated values keep their first position.
    pub fn put(&self, collection: Collection, values: &[String]) -> DatabaseResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM collection_entries WHERE collection = ?1",
            params![collection.as_str()],
        )?;

        let now = Utc::now().to_rfc3339();
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO collection_entries (collection, value, recorded_at)
                 VALUES (?1, ?2, ?3)",
            )?;
            for value in values {
                insert.execute(params![collection.as_str(), value, now])?;
            }
        }
        tx.commit()?;

        debug!(collection = %collection, count = values.len(), "Collection replaced");
        Ok(())
    }

    // ==========================================
    // Row-level access
    // ==========================================

    /// Whether `value` is a member of `collection`.
    pub fn contains(&self, collection: Collection, value: &str) -> DatabaseResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM collection_entries WHERE collection = ?1 AND value = ?2",
                params![collection.as_str(), value],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Append `value` to `collection`. Returns false if it was already there.
    pub fn insert(&self, collection: Collection, value: &str) -> DatabaseResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO collection_entries (collection, value, recorded_at)
             VALUES (?1, ?2, ?3)",
            params![collection.as_str(), value, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted == 1)
    }

    /// Remove `value` from `collection`. Returns false if it was absent.
    pub fn remove(&self, collection: Collection, value: &str) -> DatabaseResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM collection_entries WHERE collection = ?1 AND value = ?2",
            params![collection.as_str(), value],
        )?;
        Ok(removed > 0)
    }

    /// Number of values in `collection`.
    pub fn len(&self, collection: Collection) -> DatabaseResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM collection_entries WHERE collection = ?1",
            params![collection.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Whether `collection` has no values.
    pub fn is_empty(&self, collection: Collection) -> DatabaseResult<bool> {
        Ok(self.len(collection)? == 0)
    }

    /// Drop everything but the `keep` most recently inserted values.
    /// Returns how many values were removed.
    pub fn retain_latest(&self, collection: Collection, keep: usize) -> DatabaseResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM collection_entries
             WHERE collection = ?1
               AND seq NOT IN (
                   SELECT seq FROM collection_entries
                   WHERE collection = ?1
                   ORDER BY seq DESC
                   LIMIT ?2
               )",
            params![collection.as_str(), keep as i64],
        )?;

        if removed > 0 {
            debug!(collection = %collection, removed, keep, "Trimmed collection");
        }
        Ok(removed)
    }

    /// Size of every collection.
    pub fn stats(&self) -> DatabaseResult<CollectionStats> {
        Ok(CollectionStats {
            processed_messages: self.len(Collection::ProcessedMessages)?,
            processed_submissions: self.len(Collection::ProcessedSubmissions)?,
            subscribers: self.len(Collection::Subscribers)?,
        })
    }
}
