//! Versioned schema migrations.
//!
//! Every applied migration is recorded in the `metadata` table under
//! `migration:<id>`, so running the engine twice is a no-op.

use chrono::Utc;
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Result, params};

/// Bumped whenever a migration is appended.
pub const SQL_SCHEMA_VERSION: &str = "2";

struct Migration {
    id: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "20240601_0001_create_core_tables",
        description: "time boxes, sessions and session events",
        sql: r#"
            CREATE TABLE IF NOT EXISTS time_boxes (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                is_hidden  INTEGER NOT NULL DEFAULT 0,
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id             TEXT PRIMARY KEY,
                start_datetime TEXT,
                end_datetime   TEXT,
                duration       INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS session_events (
                id             TEXT PRIMARY KEY,
                time_box_id    TEXT NOT NULL REFERENCES time_boxes(id),
                session_id     TEXT NOT NULL REFERENCES sessions(id),
                start_datetime TEXT NOT NULL,
                end_datetime   TEXT,
                seconds        INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_session_events_session
                ON session_events(session_id, start_datetime);
        "#,
    },
    Migration {
        id: "20240715_0002_add_time_box_colour",
        description: "colour column on time boxes",
        sql: "ALTER TABLE time_boxes ADD COLUMN colour TEXT NOT NULL DEFAULT '#77C8FF';",
    },
];

fn ensure_metadata_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS metadata (
            name  TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM metadata WHERE name = ?1",
            [format!("migration:{id}")],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Public entry point: run all pending migrations, returning how many ran.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_metadata_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.id)? {
            debug!("migration {} already applied", m.id);
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(m.sql)?;
        tx.execute(
            "INSERT INTO metadata (name, value) VALUES (?1, ?2)",
            params![format!("migration:{}", m.id), Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        info!("migration applied: {} ({})", m.id, m.description);
        applied += 1;
    }

    conn.execute(
        "INSERT OR REPLACE INTO metadata (name, value) VALUES ('sql_schema_version', ?1)",
        [SQL_SCHEMA_VERSION],
    )?;

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_recorded_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);

        let version: String = conn
            .query_row(
                "SELECT value FROM metadata WHERE name = 'sql_schema_version'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(version, SQL_SCHEMA_VERSION);
    }
}
