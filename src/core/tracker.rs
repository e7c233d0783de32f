//! Live tracking: activating time boxes, stopping a session, refreshing
//! the running counters.

use crate::db::pool::DbPool;
use crate::db::queries::{
    find_active_session, find_running_interval, list_categories, list_intervals, upsert_interval,
    upsert_session,
};
use crate::errors::{AppError, AppResult};
use crate::models::category::{TimeBox, find_box};
use crate::models::interval::Interval;
use crate::models::session::Session;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use log::{debug, info};

#[derive(Debug, Clone)]
pub enum Activation {
    /// The box was already running; nothing was written.
    AlreadyRunning { time_box: TimeBox, interval: Interval },
    Started {
        time_box: TimeBox,
        session: Session,
        interval: Interval,
        /// Interval closed to make room for the new one.
        closed: Option<Interval>,
        new_session: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Stopped {
    pub session: Session,
    pub closed: Option<Interval>,
}

/// Start tracking `category_ref` at `now`.
///
/// Closes the running interval, opens a session when none is active and
/// starts a new running interval, all in one transaction.
pub fn activate(pool: &mut DbPool, category_ref: &str, now: DateTime<Utc>) -> AppResult<Activation> {
    let boxes = list_categories(&pool.conn, true)?;
    let time_box = find_box(&boxes, category_ref)
        .ok_or_else(|| AppError::NotFound(format!("time box '{category_ref}'")))?
        .clone();
    if !time_box.is_selectable() {
        return Err(AppError::Inactive(time_box.name));
    }

    let running = find_running_interval(&pool.conn)?;
    if let Some(r) = &running {
        if r.category_id == time_box.id {
            debug!("'{}' is already running", time_box.name);
            return Ok(Activation::AlreadyRunning {
                time_box,
                interval: r.clone(),
            });
        }
        if now < r.start {
            return Err(AppError::Precondition(format!(
                "cannot switch at {now}: running interval started at {}",
                r.start
            )));
        }
    }
    if let Some(active) = find_active_session(&pool.conn)? {
        ensure_history_ends_by(&pool.conn, &active, now)?;
    }

    let tx = pool.begin()?;

    let closed = match running {
        Some(mut r) => {
            close_interval(&mut r, now);
            upsert_interval(&tx, &r)?;
            Some(r)
        }
        None => None,
    };

    let (mut session, new_session) = match find_active_session(&tx)? {
        Some(s) => (s, false),
        None => (Session::new(), true),
    };
    let start = *session.start.get_or_insert(now);
    session.duration = (now - start).num_seconds().max(0);
    upsert_session(&tx, &session)?;

    let interval = Interval::start_running(&session.id, &time_box.id, now);
    upsert_interval(&tx, &interval)?;

    tx.commit()?;

    if new_session {
        info!("session {} started at {now}", session.id);
    }

    Ok(Activation::Started {
        time_box,
        session,
        interval,
        closed,
        new_session,
    })
}

/// Stop the active session at `now`.
pub fn stop(pool: &mut DbPool, now: DateTime<Utc>) -> AppResult<Stopped> {
    let mut session = find_active_session(&pool.conn)?.ok_or(AppError::NoActiveSession)?;
    let running = find_running_interval(&pool.conn)?;

    let start = session.start.unwrap_or(now);
    if now < start {
        return Err(AppError::Precondition(format!(
            "cannot stop at {now}: session started at {start}"
        )));
    }
    ensure_history_ends_by(&pool.conn, &session, now)?;

    let tx = pool.begin()?;

    let closed = match running {
        Some(mut r) => {
            close_interval(&mut r, now);
            upsert_interval(&tx, &r)?;
            Some(r)
        }
        None => None,
    };

    session.start = Some(start);
    session.end = Some(now);
    session.duration = (now - start).num_seconds();
    upsert_session(&tx, &session)?;

    tx.commit()?;
    info!("session {} stopped after {}s", session.id, session.duration);

    Ok(Stopped { session, closed })
}

/// Refresh the cached counters of a live session in memory.
///
/// Repeated calls with the same `now` leave the values unchanged.
pub fn tick(session: &mut Session, intervals: &mut [Interval], now: DateTime<Utc>) {
    for interval in intervals.iter_mut().filter(|i| i.is_running()) {
        interval.seconds = interval.effective_seconds(now);
    }
    if let (Some(start), None) = (session.start, session.end) {
        session.duration = (now - start).num_seconds().max(0);
    }
}

/// Refuse `now` when a stored interval of `session` ends after it: a new
/// running interval or the session end would otherwise overlap it.
fn ensure_history_ends_by(conn: &Connection, session: &Session, now: DateTime<Utc>) -> AppResult<()> {
    let latest = list_intervals(conn, &session.id)?
        .into_iter()
        .filter_map(|i| i.end)
        .max();
    match latest {
        Some(end) if end > now => Err(AppError::Precondition(format!(
            "session {} has time recorded until {end}, after {now}",
            session.id
        ))),
        _ => Ok(()),
    }
}

fn close_interval(interval: &mut Interval, now: DateTime<Utc>) {
    interval.end = Some(now);
    interval.seconds = interval.effective_seconds(now);
}
