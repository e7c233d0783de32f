//! Interval reconciliation.
//!
//! Overlays a single-category window `[new_start, new_end)` on top of the
//! intervals of one session. Parts of existing intervals outside the window
//! survive under their original time box; the overlapped part is replaced
//! (last write wins). The result is a minimal patch: ids to delete, intervals
//! to update in place, drafts to insert.

use crate::errors::{AppError, AppResult};
use crate::models::interval::{Interval, IntervalDraft};
use crate::utils::time::{format_timestamp, seconds_between};
use chrono::{DateTime, Utc};
use log::warn;
use std::collections::BTreeSet;

/// Position of an existing interval `[es, ee)` relative to the edit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// `ee <= new_start`
    Before,
    /// `es < new_start < ee <= new_end`
    StraddlesStart,
    /// `new_start <= es && ee <= new_end`
    Contained,
    /// `es < new_start && new_end < ee`: the window sits inside the interval.
    Encloses,
    /// `new_start <= es < new_end < ee`
    StraddlesEnd,
    /// `new_end <= es`
    After,
}

pub fn classify(
    es: DateTime<Utc>,
    ee: DateTime<Utc>,
    new_start: DateTime<Utc>,
    new_end: DateTime<Utc>,
) -> Overlap {
    if ee <= new_start {
        Overlap::Before
    } else if es >= new_end {
        Overlap::After
    } else if es >= new_start && ee <= new_end {
        Overlap::Contained
    } else if es < new_start && ee > new_end {
        Overlap::Encloses
    } else if es < new_start {
        Overlap::StraddlesStart
    } else {
        Overlap::StraddlesEnd
    }
}

/// The edit set produced by [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    pub to_delete: BTreeSet<String>,
    pub to_update: Vec<Interval>,
    pub to_insert: Vec<IntervalDraft>,
    /// Items skipped because their duration could not be computed.
    pub dropped: usize,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_update.is_empty() && self.to_insert.is_empty()
    }

    /// Apply the plan to an in-memory copy of the session's intervals.
    /// Inserted drafts receive fresh ids. The result is sorted by start.
    pub fn apply_to(&self, existing: &[Interval]) -> Vec<Interval> {
        let mut out: Vec<Interval> = existing
            .iter()
            .filter(|e| !self.to_delete.contains(&e.id))
            .map(|e| {
                self.to_update
                    .iter()
                    .find(|u| u.id == e.id)
                    .cloned()
                    .unwrap_or_else(|| e.clone())
            })
            .collect();

        out.extend(self.to_insert.iter().cloned().map(IntervalDraft::into_interval));
        out.sort_by_key(|i| i.start);
        out
    }
}

/// Compute the edit set that paints `[new_start, new_end)` with `new_category_id`.
///
/// `existing` must be the intervals of `session_id`, sorted by start. Running
/// intervals are compared as if they ended at `now`; `now` is never written as
/// an end.
pub fn reconcile(
    existing: &[Interval],
    new_start: DateTime<Utc>,
    new_end: DateTime<Utc>,
    new_category_id: &str,
    session_id: &str,
    now: DateTime<Utc>,
) -> AppResult<ReconcilePlan> {
    if new_end <= new_start {
        return Err(AppError::Precondition(format!(
            "edit window must be non-empty ({} .. {})",
            format_timestamp(&new_start),
            format_timestamp(&new_end)
        )));
    }

    let mut plan = ReconcilePlan::default();
    let mut already_present = false;

    for e in existing {
        let es = e.start;
        let ee = e.effective_end(now);

        match classify(es, ee, new_start, new_end) {
            Overlap::Before | Overlap::After => {}

            Overlap::StraddlesStart => {
                let mut updated = e.clone();
                updated.end = Some(new_start);
                push_update(&mut plan, updated, now);
            }

            Overlap::Contained => {
                if es == new_start
                    && ee == new_end
                    && !e.is_running()
                    && e.category_id == new_category_id
                {
                    already_present = true;
                    continue;
                }
                plan.to_delete.insert(e.id.clone());
            }

            Overlap::Encloses => {
                if e.is_running() {
                    // Keep the running interval as the latest one: it moves to
                    // the tail and the head becomes a closed copy.
                    let mut updated = e.clone();
                    updated.start = new_end;
                    push_update(&mut plan, updated, now);
                    push_insert(&mut plan, draft(e, es, new_start));
                } else {
                    let mut updated = e.clone();
                    updated.end = Some(new_start);
                    push_update(&mut plan, updated, now);
                    push_insert(&mut plan, draft(e, new_end, ee));
                }
            }

            Overlap::StraddlesEnd => {
                let mut updated = e.clone();
                updated.start = new_end;
                push_update(&mut plan, updated, now);
            }
        }
    }

    if !already_present {
        push_insert(
            &mut plan,
            IntervalDraft {
                session_id: session_id.to_string(),
                category_id: new_category_id.to_string(),
                start: new_start,
                end: new_end,
                seconds: 0,
            },
        );
    }

    Ok(plan)
}

/// Sum of effective durations; running intervals count up to `now`.
pub fn total_seconds(intervals: &[Interval], now: DateTime<Utc>) -> i64 {
    intervals.iter().map(|i| i.effective_seconds(now)).sum()
}

fn draft(source: &Interval, start: DateTime<Utc>, end: DateTime<Utc>) -> IntervalDraft {
    IntervalDraft {
        session_id: source.session_id.clone(),
        category_id: source.category_id.clone(),
        start,
        end,
        seconds: 0,
    }
}

fn push_update(plan: &mut ReconcilePlan, mut interval: Interval, now: DateTime<Utc>) {
    match seconds_between(interval.start, interval.effective_end(now)) {
        Some(secs) => {
            interval.seconds = secs;
            plan.to_update.push(interval);
        }
        None => {
            warn!(
                "reconcile: dropping update interval_id={} start={} end={:?}: duration not computable",
                interval.id,
                format_timestamp(&interval.start),
                interval.end.as_ref().map(format_timestamp)
            );
            plan.dropped += 1;
        }
    }
}

fn push_insert(plan: &mut ReconcilePlan, mut d: IntervalDraft) {
    match seconds_between(d.start, d.end) {
        Some(secs) => {
            d.seconds = secs;
            plan.to_insert.push(d);
        }
        None => {
            warn!(
                "reconcile: dropping insert category_id={} start={} end={}: duration not computable",
                d.category_id,
                format_timestamp(&d.start),
                format_timestamp(&d.end)
            );
            plan.dropped += 1;
        }
    }
}
