//! Committing a re-assignment of historical time.

use crate::core::reconcile::{ReconcilePlan, reconcile, total_seconds};
use crate::core::validate::check_edit;
use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_interval, insert_interval, list_categories, list_intervals, list_sessions,
    upsert_interval, upsert_session,
};
use crate::errors::{AppError, AppResult};
use crate::models::category::find_box;
use crate::models::interval::Interval;
use crate::models::session::{Session, find_session};
use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, warn};

/// What a committed edit did.
#[derive(Debug, Clone)]
pub struct EditReport {
    pub session_number: usize,
    pub session: Session,
    pub deleted: usize,
    pub updated: usize,
    pub inserted: usize,
    pub dropped: usize,
    /// Intervals as stored after commit.
    pub intervals: Vec<Interval>,
}

pub struct EditLogic;

impl EditLogic {
    /// Overwrite `from`..`to` (local `HH:MM`) of a session with `category_ref`.
    ///
    /// Nothing is written unless validation passes; once it does, every
    /// delete, update, insert and the session refresh commit together or
    /// not at all.
    pub fn apply(
        pool: &mut DbPool,
        session_ref: &str,
        from: &str,
        to: &str,
        category_ref: Option<&str>,
        offset: FixedOffset,
        now: DateTime<Utc>,
    ) -> AppResult<EditReport> {
        let sessions = list_sessions(&pool.conn)?;
        let (session_number, session) = find_session(&sessions, session_ref)
            .ok_or_else(|| AppError::NotFound(format!("session '{session_ref}'")))?;
        let session = session.clone();

        let existing = list_intervals(&pool.conn, &session.id)?;
        let (start, end) = check_edit(category_ref, from, to, &existing, offset, now)?;

        let boxes = list_categories(&pool.conn, true)?;
        let reference = category_ref.unwrap_or_default();
        let category = find_box(&boxes, reference)
            .ok_or_else(|| AppError::NotFound(format!("time box '{reference}'")))?;
        if category.is_deleted() {
            return Err(AppError::Inactive(category.name.clone()));
        }

        let plan = reconcile(&existing, start, end, &category.id, &session.id, now)?;
        if plan.dropped > 0 {
            warn!(
                "{} item(s) with no computable duration were skipped while editing session {}",
                plan.dropped, session_number
            );
        }

        let updated_session = refresh_session(&session, &plan.apply_to(&existing), now);
        commit_plan(pool, &plan, &updated_session)?;
        debug!("edit committed for session {}", updated_session.id);

        Ok(EditReport {
            session_number,
            deleted: plan.to_delete.len(),
            updated: plan.to_update.len(),
            inserted: plan.to_insert.len(),
            dropped: plan.dropped,
            intervals: list_intervals(&pool.conn, &updated_session.id)?,
            session: updated_session,
        })
    }
}

/// Apply `plan` and upsert `session` in a single transaction.
///
/// On any error the transaction handle is dropped uncommitted, which rolls
/// back everything written through it.
pub fn commit_plan(pool: &mut DbPool, plan: &ReconcilePlan, session: &Session) -> AppResult<()> {
    let tx = pool.begin()?;

    for id in &plan.to_delete {
        delete_interval(&tx, id)?;
    }
    for interval in &plan.to_update {
        upsert_interval(&tx, interval)?;
    }
    for draft in &plan.to_insert {
        insert_interval(&tx, draft)?;
    }
    upsert_session(&tx, session)?;

    tx.commit()?;
    Ok(())
}

/// Session after an edit: duration is the sum of its intervals and the
/// span grows to cover every interval. An active session stays open.
pub fn refresh_session(session: &Session, intervals: &[Interval], now: DateTime<Utc>) -> Session {
    let first = intervals.iter().map(|i| i.start).min();
    let last = intervals.iter().map(|i| i.effective_end(now)).max();

    let start = match (session.start, first) {
        (Some(s), Some(f)) => Some(s.min(f)),
        (s, f) => s.or(f),
    };
    let end = match (session.end, last) {
        (Some(e), Some(l)) => Some(e.max(l)),
        (e, _) => e,
    };

    Session {
        id: session.id.clone(),
        start,
        end,
        duration: total_seconds(intervals, now),
    }
}
