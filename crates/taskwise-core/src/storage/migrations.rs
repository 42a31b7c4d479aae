//! Database schema migrations for taskwise.
//!
//! Migrations are versioned and applied automatically when opening the
//! store. The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{info, warn};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: tasks, context entries and categories.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS tasks (
            id             TEXT PRIMARY KEY,
            title          TEXT NOT NULL CHECK (length(trim(title)) > 0),
            description    TEXT NOT NULL DEFAULT '',
            category       TEXT NOT NULL DEFAULT '',
            priority_score INTEGER NOT NULL DEFAULT 3
                           CHECK (priority_score BETWEEN 1 AND 5),
            deadline       TEXT NOT NULL,
            status         TEXT NOT NULL DEFAULT 'pending',
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS context_entries (
            id                 TEXT PRIMARY KEY,
            content            TEXT NOT NULL CHECK (length(trim(content)) > 0),
            source_type        TEXT NOT NULL DEFAULT 'notes',
            created_at         TEXT NOT NULL,
            processed_insights TEXT NOT NULL DEFAULT '',
            keywords           TEXT NOT NULL DEFAULT '[]',
            sentiment          TEXT NOT NULL DEFAULT 'neutral'
        );

        CREATE TABLE IF NOT EXISTS categories (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            color       TEXT NOT NULL DEFAULT '#3b82f6',
            usage_count INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    info!(version = 1, "applied schema migration");
    Ok(())
}

/// Migration v2: track whether a task was shaped by the heuristics.
///
/// Adds:
/// - ai_enhanced: suggestion applied before saving
/// - context_based: context existed when the task was created
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "ALTER TABLE tasks ADD COLUMN ai_enhanced INTEGER NOT NULL DEFAULT 0;
         ALTER TABLE tasks ADD COLUMN context_based INTEGER NOT NULL DEFAULT 0;
         CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
         CREATE INDEX IF NOT EXISTS idx_context_created_at ON context_entries(created_at);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    info!(version = 2, "applied schema migration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn), 0);
        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn), CURRENT_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn), CURRENT_VERSION);
    }

    #[test]
    fn v1_database_gains_flag_columns() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO tasks (id, title, deadline, created_at, updated_at)
             VALUES ('t1', 'Old task', '2024-01-01', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();

        let (ai, ctx): (bool, bool) = conn
            .query_row(
                "SELECT ai_enhanced, context_based FROM tasks WHERE id = 't1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert!(!ai);
        assert!(!ctx);
    }
}
