//! Database schema migrations for studyday.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::warn;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if a migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

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
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: day store and week store.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS lectures (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            day       TEXT NOT NULL,
            course    TEXT NOT NULL,
            start_min INTEGER NOT NULL,
            end_min   INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS plan_blocks (
            day       TEXT NOT NULL,
            seq       INTEGER NOT NULL,
            start_min INTEGER NOT NULL,
            end_min   INTEGER NOT NULL,
            label     TEXT NOT NULL,
            kind      TEXT NOT NULL,
            course    TEXT NOT NULL DEFAULT '',
            manual    INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (day, seq)
        );

        CREATE TABLE IF NOT EXISTS week_tasks (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            week_start     TEXT NOT NULL,
            course         TEXT NOT NULL,
            title          TEXT NOT NULL,
            due_date       TEXT NOT NULL,
            due_min        INTEGER NOT NULL,
            minutes_needed INTEGER NOT NULL,
            prepared       INTEGER NOT NULL DEFAULT 0,
            repeat_weekly  INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_lectures_day ON lectures(day);
        CREATE INDEX IF NOT EXISTS idx_week_tasks_week ON week_tasks(week_start);",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: index the history lookup (study minutes by label and day).
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_plan_blocks_kind_label_day
            ON plan_blocks(kind, label, day);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('lectures', 'plan_blocks', 'week_tasks')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
