//! Per-session and per-date breakdowns of tracked time.

use crate::models::category::TimeBox;
use crate::models::interval::Interval;
use crate::models::session::Session;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Label for untracked time inside a session span.
pub const BREAK: &str = "Break";
/// Label for intervals whose time box no longer exists.
pub const UNKNOWN: &str = "Unknown";

/// Seconds per time-box name, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals(pub Vec<(String, i64)>);

impl Totals {
    pub fn add(&mut self, name: &str, seconds: i64) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, s)) => *s += seconds,
            None => self.0.push((name.to_string(), seconds)),
        }
    }

    pub fn get(&self, name: &str) -> i64 {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
            .unwrap_or(0)
    }

    pub fn tracked(&self) -> i64 {
        self.0.iter().map(|(_, s)| s).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// 1-based position among all sessions.
    pub number: usize,
    pub session_id: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub totals: Totals,
    pub break_seconds: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateSummary {
    pub date: NaiveDate,
    pub sessions: usize,
    pub totals: Totals,
    pub break_seconds: i64,
}

/// Name of a time box by id, `Unknown` when it is missing.
pub fn box_name<'a>(boxes: &'a [TimeBox], id: &str) -> &'a str {
    boxes
        .iter()
        .find(|b| b.id == id)
        .map(|b| b.name.as_str())
        .unwrap_or(UNKNOWN)
}

/// Break down one session. Intervals are clipped to the session span; an
/// active session's span ends at `now`.
pub fn summarize_session(
    number: usize,
    session: &Session,
    intervals: &[Interval],
    boxes: &[TimeBox],
    now: DateTime<Utc>,
) -> SessionSummary {
    let span_end = session.end.unwrap_or(now);
    let span_start = session
        .start
        .or_else(|| intervals.iter().map(|i| i.start).min())
        .unwrap_or(span_end);

    let mut totals = Totals::default();
    for interval in intervals.iter().filter(|i| i.session_id == session.id) {
        let s = interval.start.max(span_start);
        let e = interval.effective_end(now).min(span_end);
        let seconds = (e - s).num_seconds().max(0);
        totals.add(box_name(boxes, &interval.category_id), seconds);
    }

    let span = (span_end - span_start).num_seconds().max(0);
    let break_seconds = (span - totals.tracked()).max(0);

    SessionSummary {
        number,
        session_id: session.id.clone(),
        start: session.start,
        end: session.end,
        totals,
        break_seconds,
    }
}

/// Summaries for every session, numbered in list order.
pub fn summarize_sessions(
    sessions: &[Session],
    intervals: &[Interval],
    boxes: &[TimeBox],
    now: DateTime<Utc>,
) -> Vec<SessionSummary> {
    let mut by_session: HashMap<&str, Vec<Interval>> = HashMap::new();
    for interval in intervals {
        by_session
            .entry(interval.session_id.as_str())
            .or_default()
            .push(interval.clone());
    }

    sessions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let own = by_session.get(s.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            summarize_session(i + 1, s, own, boxes, now)
        })
        .collect()
}

/// Sum session summaries by the local date their session started on.
/// Sessions that never started are left out.
pub fn summarize_by_date(summaries: &[SessionSummary], offset: FixedOffset) -> Vec<DateSummary> {
    let mut by_date: BTreeMap<NaiveDate, DateSummary> = BTreeMap::new();

    for s in summaries {
        let Some(start) = s.start else { continue };
        let date = start.with_timezone(&offset).date_naive();
        let entry = by_date.entry(date).or_insert_with(|| DateSummary {
            date,
            sessions: 0,
            totals: Totals::default(),
            break_seconds: 0,
        });
        entry.sessions += 1;
        for (name, seconds) in &s.totals.0 {
            entry.totals.add(name, *seconds);
        }
        entry.break_seconds += s.break_seconds;
    }

    by_date.into_values().collect()
}

/// Column names for wide summary tables: every box name once, in
/// creation order, plus `Unknown` when some interval needs it.
pub fn column_names(boxes: &[TimeBox], totals: &[&Totals]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for b in boxes {
        if !names.contains(&b.name) {
            names.push(b.name.clone());
        }
    }
    if totals.iter().any(|t| t.get(UNKNOWN) > 0) && !names.iter().any(|n| n == UNKNOWN) {
        names.push(UNKNOWN.to_string());
    }
    names
}
