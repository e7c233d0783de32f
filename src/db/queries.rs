use crate::errors::{AppError, AppResult};
use crate::models::category::{CategoryStatus, TimeBox, Visibility};
use crate::models::interval::{Interval, IntervalDraft};
use crate::models::session::Session;
use crate::utils::time::{format_timestamp, parse_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, Transaction, params};

// ---------------------------
// Row mappers
// ---------------------------

fn timestamp_column(row: &Row, name: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(name)?;
    raw.map(|s| {
        parse_timestamp(&s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
        })
    })
    .transpose()
}

fn required_timestamp(row: &Row, name: &str) -> Result<DateTime<Utc>> {
    timestamp_column(row, name)?.ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Null,
            Box::new(AppError::InvalidTimestamp(format!("{name} is NULL"))),
        )
    })
}

pub fn map_time_box(row: &Row) -> Result<TimeBox> {
    Ok(TimeBox {
        id: row.get("id")?,
        name: row.get("name")?,
        colour: row.get("colour")?,
        visibility: if row.get::<_, i32>("is_hidden")? == 1 {
            Visibility::Hidden
        } else {
            Visibility::Visible
        },
        status: if row.get::<_, i32>("is_deleted")? == 1 {
            CategoryStatus::Deleted
        } else {
            CategoryStatus::Active
        },
    })
}

pub fn map_session(row: &Row) -> Result<Session> {
    Ok(Session {
        id: row.get("id")?,
        start: timestamp_column(row, "start_datetime")?,
        end: timestamp_column(row, "end_datetime")?,
        duration: row.get("duration")?,
    })
}

pub fn map_interval(row: &Row) -> Result<Interval> {
    Ok(Interval {
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        category_id: row.get("time_box_id")?,
        start: required_timestamp(row, "start_datetime")?,
        end: timestamp_column(row, "end_datetime")?,
        seconds: row.get("seconds")?,
    })
}

fn ts(dt: Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(format_timestamp)
}

// ---------------------------
// Time boxes
// ---------------------------

/// Time boxes in creation order. Deleted ones only with `include_deleted`.
pub fn list_categories(conn: &Connection, include_deleted: bool) -> AppResult<Vec<TimeBox>> {
    let sql = if include_deleted {
        "SELECT * FROM time_boxes ORDER BY rowid ASC"
    } else {
        "SELECT * FROM time_boxes WHERE is_deleted = 0 ORDER BY rowid ASC"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_time_box)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_categories(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM time_boxes", [], |r| r.get(0))?)
}

pub fn insert_category(conn: &Connection, tb: &TimeBox) -> AppResult<()> {
    conn.execute(
        "INSERT INTO time_boxes (id, name, colour, is_hidden, is_deleted)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            tb.id,
            tb.name,
            tb.colour,
            tb.is_hidden() as i32,
            tb.is_deleted() as i32,
        ],
    )?;
    Ok(())
}

fn update_category(conn: &Connection, id: &str, sql: &str, value: &dyn rusqlite::ToSql) -> AppResult<()> {
    let changed = conn.execute(sql, params![value, id])?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("time box '{id}'")));
    }
    Ok(())
}

pub fn rename_category(conn: &Connection, id: &str, name: &str) -> AppResult<()> {
    update_category(conn, id, "UPDATE time_boxes SET name = ?1 WHERE id = ?2", &name)
}

pub fn set_category_colour(conn: &Connection, id: &str, colour: &str) -> AppResult<()> {
    update_category(conn, id, "UPDATE time_boxes SET colour = ?1 WHERE id = ?2", &colour)
}

pub fn set_category_visibility(conn: &Connection, id: &str, visibility: Visibility) -> AppResult<()> {
    let hidden = matches!(visibility, Visibility::Hidden) as i32;
    update_category(conn, id, "UPDATE time_boxes SET is_hidden = ?1 WHERE id = ?2", &hidden)
}

/// Mark as deleted. The row stays so historic intervals keep their name.
pub fn soft_delete_category(conn: &Connection, id: &str) -> AppResult<()> {
    update_category(conn, id, "UPDATE time_boxes SET is_deleted = ?1 WHERE id = ?2", &1)
}

// ---------------------------
// Sessions
// ---------------------------

/// All sessions, oldest first. Session numbers shown to users are the
/// 1-based positions in this list.
pub fn list_sessions(conn: &Connection) -> AppResult<Vec<Session>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM sessions
         ORDER BY start_datetime IS NULL, start_datetime ASC, rowid ASC",
    )?;
    let rows = stmt.query_map([], map_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_active_session(conn: &Connection) -> AppResult<Option<Session>> {
    let session = conn
        .query_row(
            "SELECT * FROM sessions
             WHERE end_datetime IS NULL
             ORDER BY rowid DESC
             LIMIT 1",
            [],
            map_session,
        )
        .optional()?;
    Ok(session)
}

pub fn upsert_session(tx: &Transaction, session: &Session) -> AppResult<()> {
    tx.execute(
        "INSERT INTO sessions (id, start_datetime, end_datetime, duration)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (id) DO UPDATE SET
            start_datetime = excluded.start_datetime,
            end_datetime   = excluded.end_datetime,
            duration       = excluded.duration",
        params![
            session.id,
            ts(session.start),
            ts(session.end),
            session.duration
        ],
    )?;
    Ok(())
}

// ---------------------------
// Intervals (session events)
// ---------------------------

pub fn list_intervals(conn: &Connection, session_id: &str) -> AppResult<Vec<Interval>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM session_events
         WHERE session_id = ?1
         ORDER BY start_datetime ASC, rowid ASC",
    )?;
    let rows = stmt.query_map([session_id], map_interval)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every interval of every session, in time order.
pub fn list_all_intervals(conn: &Connection) -> AppResult<Vec<Interval>> {
    let mut stmt =
        conn.prepare("SELECT * FROM session_events ORDER BY start_datetime ASC, rowid ASC")?;
    let rows = stmt.query_map([], map_interval)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_running_interval(conn: &Connection) -> AppResult<Option<Interval>> {
    let interval = conn
        .query_row(
            "SELECT * FROM session_events
             WHERE end_datetime IS NULL
             ORDER BY start_datetime DESC
             LIMIT 1",
            [],
            map_interval,
        )
        .optional()?;
    Ok(interval)
}

pub fn upsert_interval(tx: &Transaction, interval: &Interval) -> AppResult<()> {
    tx.execute(
        "INSERT INTO session_events (id, time_box_id, session_id, start_datetime, end_datetime, seconds)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (id) DO UPDATE SET
            time_box_id    = excluded.time_box_id,
            session_id     = excluded.session_id,
            start_datetime = excluded.start_datetime,
            end_datetime   = excluded.end_datetime,
            seconds        = excluded.seconds",
        params![
            interval.id,
            interval.category_id,
            interval.session_id,
            format_timestamp(&interval.start),
            ts(interval.end),
            interval.seconds,
        ],
    )?;
    Ok(())
}

/// Store a reconciler draft under a fresh id and return the stored row.
pub fn insert_interval(tx: &Transaction, draft: &IntervalDraft) -> AppResult<Interval> {
    let interval = draft.clone().into_interval();
    tx.execute(
        "INSERT INTO session_events (id, time_box_id, session_id, start_datetime, end_datetime, seconds)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            interval.id,
            interval.category_id,
            interval.session_id,
            format_timestamp(&interval.start),
            ts(interval.end),
            interval.seconds,
        ],
    )?;
    Ok(interval)
}

pub fn delete_interval(tx: &Transaction, id: &str) -> AppResult<()> {
    tx.execute("DELETE FROM session_events WHERE id = ?1", [id])?;
    Ok(())
}

// ---------------------------
// Metadata
// ---------------------------

pub fn get_metadata(conn: &Connection, name: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM metadata WHERE name = ?1", [name], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(value)
}

pub fn set_metadata(conn: &Connection, name: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)",
        params![name, value],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn, &["Code".to_string(), "Read".to_string()]).unwrap();
        pool
    }

    #[test]
    fn soft_deleted_boxes_are_hidden_from_default_listing() {
        let pool = pool();
        let boxes = list_categories(&pool.conn, false).unwrap();
        soft_delete_category(&pool.conn, &boxes[0].id).unwrap();

        let visible = list_categories(&pool.conn, false).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Read");

        let all = list_categories(&pool.conn, true).unwrap();
        assert!(all[0].is_deleted());
    }

    #[test]
    fn updating_unknown_box_is_not_found() {
        let pool = pool();
        let err = rename_category(&pool.conn, "nope", "X").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn running_interval_round_trips_with_null_end() {
        let mut pool = pool();
        let code = list_categories(&pool.conn, false).unwrap()[0].id.clone();
        let start: DateTime<Utc> = "2024-06-01T08:00:00Z".parse().unwrap();

        let mut session = Session::new();
        session.start = Some(start);
        let running = Interval::start_running(&session.id, &code, start);

        let tx = pool.begin().unwrap();
        upsert_session(&tx, &session).unwrap();
        upsert_interval(&tx, &running).unwrap();
        tx.commit().unwrap();

        let found = find_running_interval(&pool.conn).unwrap().unwrap();
        assert_eq!(found, running);
        assert_eq!(find_active_session(&pool.conn).unwrap().unwrap().id, session.id);
    }

    #[test]
    fn dropped_transaction_leaves_storage_untouched() {
        let mut pool = pool();
        let session = Session::new();
        {
            let tx = pool.begin().unwrap();
            upsert_session(&tx, &session).unwrap();
        }
        assert!(list_sessions(&pool.conn).unwrap().is_empty());
    }
}
