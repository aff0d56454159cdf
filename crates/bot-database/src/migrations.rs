//! Database migrations.
//!
//! Migrations run in order and are tracked in the `migrations` table. Any
//! change to how the three collections are stored gets a new version here.

use crate::DatabaseResult;
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> DatabaseResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM migrations",
        [],
        |row| row.get(0),
    )?;

    if current_version > CURRENT_VERSION {
        return Err(crate::DatabaseError::Migration(format!(
            "database schema v{current_version} is newer than supported v{CURRENT_VERSION}"
        )));
    }

    if current_version < CURRENT_VERSION {
        info!(
            current_version,
            target_version = CURRENT_VERSION,
            "Running migrations"
        );
    }

    if current_version < 1 {
        migrate_v1_collection_entries(conn)?;
    }

    Ok(())
}

fn record_migration(conn: &Connection, version: i32, name: &str) -> DatabaseResult<()> {
    conn.execute(
        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
        rusqlite::params![version, name],
    )?;
    debug!(version, name, "Migration applied");
    Ok(())
}

/// V1: one row per collection member, ordered by insertion.
fn migrate_v1_collection_entries(conn: &Connection) -> DatabaseResult<()> {
    info!("Applying migration v1: collection entries");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS collection_entries (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            value TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            UNIQUE (collection, value)
        );

        CREATE INDEX IF NOT EXISTS idx_collection_entries_collection_seq
            ON collection_entries(collection, seq);
        ",
    )?;

    record_migration(conn, 1, "collection_entries")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let applied: i32 = conn
            .query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, CURRENT_VERSION);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        record_migration(&conn, CURRENT_VERSION + 1, "from_the_future").unwrap();

        assert!(matches!(
            run_migrations(&conn),
            Err(crate::DatabaseError::Migration(_))
        ));
    }
}
