// src/export/model.rs

use crate::core::summary::{BREAK, DateSummary, SessionSummary, box_name, column_names};
use crate::models::category::TimeBox;
use crate::models::interval::Interval;
use crate::models::session::Session;
use crate::utils::time::{format_hms, format_timestamp};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A rectangular table of strings, header first.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// One JSON object per row, keyed by header.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(row)
                    .map(|(h, v)| (h.clone(), Value::String(v.clone())))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

fn opt_ts(dt: Option<DateTime<Utc>>) -> String {
    dt.as_ref().map(format_timestamp).unwrap_or_default()
}

/// `Session, <box>..., Break`
pub fn summary_by_session(summaries: &[SessionSummary], boxes: &[TimeBox]) -> TableData {
    let names = column_names(boxes, &summaries.iter().map(|s| &s.totals).collect::<Vec<_>>());

    let mut headers = vec!["Session".to_string()];
    headers.extend(names.iter().cloned());
    headers.push(BREAK.to_string());

    let mut table = TableData::new(headers);
    for s in summaries {
        let mut row = vec![s.number.to_string()];
        row.extend(names.iter().map(|n| format_hms(s.totals.get(n))));
        row.push(format_hms(s.break_seconds));
        table.rows.push(row);
    }
    table
}

/// `Date, <box>..., Break` with dates as `01-Jun-2024`.
pub fn summary_by_date(dates: &[DateSummary], boxes: &[TimeBox]) -> TableData {
    let names = column_names(boxes, &dates.iter().map(|d| &d.totals).collect::<Vec<_>>());

    let mut headers = vec!["Date".to_string()];
    headers.extend(names.iter().cloned());
    headers.push(BREAK.to_string());

    let mut table = TableData::new(headers);
    for d in dates {
        let mut row = vec![d.date.format("%d-%b-%Y").to_string()];
        row.extend(names.iter().map(|n| format_hms(d.totals.get(n))));
        row.push(format_hms(d.break_seconds));
        table.rows.push(row);
    }
    table
}

/// `Session, Start, Stop, Duration`
pub fn details_sessions(sessions: &[Session]) -> TableData {
    let mut table = TableData::new(
        ["Session", "Start", "Stop", "Duration"]
            .map(String::from)
            .to_vec(),
    );
    for (i, s) in sessions.iter().enumerate() {
        table.rows.push(vec![
            (i + 1).to_string(),
            opt_ts(s.start),
            opt_ts(s.end),
            format_hms(s.duration),
        ]);
    }
    table
}

/// `Event, Session, Start, End, Duration`; running intervals count up to `now`.
pub fn details_session_events(
    sessions: &[Session],
    intervals: &[Interval],
    boxes: &[TimeBox],
    now: DateTime<Utc>,
) -> TableData {
    let mut table = TableData::new(
        ["Event", "Session", "Start", "End", "Duration"]
            .map(String::from)
            .to_vec(),
    );
    for iv in intervals {
        let number = sessions
            .iter()
            .position(|s| s.id == iv.session_id)
            .map(|p| (p + 1).to_string())
            .unwrap_or_default();
        table.rows.push(vec![
            box_name(boxes, &iv.category_id).to_string(),
            number,
            format_timestamp(&iv.start),
            opt_ts(iv.end),
            format_hms(iv.effective_seconds(now)),
        ]);
    }
    table
}
