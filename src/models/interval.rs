use chrono::{DateTime, Utc};
use serde::Serialize;

/// One contiguous attribution of time to a single time box ("session event").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    pub id: String,
    pub session_id: String,
    pub category_id: String,
    pub start: DateTime<Utc>,
    /// `None` while the interval is running.
    pub end: Option<DateTime<Utc>>,
    /// Cached `end - start`, refreshed whenever the bounds move.
    pub seconds: i64,
}

impl Interval {
    /// Open a running interval at `start`.
    pub fn start_running(session_id: &str, category_id: &str, start: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            category_id: category_id.to_string(),
            start,
            end: None,
            seconds: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    /// End used for comparisons: running intervals end "now".
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(now)
    }

    pub fn effective_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.effective_end(now) - self.start).num_seconds().max(0)
    }
}

/// An interval computed by the reconciler that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalDraft {
    pub session_id: String,
    pub category_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub seconds: i64,
}

impl IntervalDraft {
    /// Assign an id; used when the draft is persisted.
    pub fn into_interval(self) -> Interval {
        Interval {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: self.session_id,
            category_id: self.category_id,
            start: self.start,
            end: Some(self.end),
            seconds: self.seconds,
        }
    }
}
