//! Time utilities: parsing HH:MM, RFC 3339 timestamps, offsets and duration formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, DurationRound, FixedOffset, Local, NaiveTime, Offset, SecondsFormat, TimeDelta, Utc};
use regex::Regex;
use std::sync::LazyLock;

static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("time-of-day pattern is valid")
});

/// Strict 24h `HH:MM` parsing. `9:00`, `24:00` and `09:60` are rejected.
pub fn parse_time_of_day(t: &str) -> Option<NaiveTime> {
    let caps = TIME_OF_DAY.captures(t)?;
    let h: u32 = caps[1].parse().ok()?;
    let m: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(h, m, 0)
}

pub fn parse_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

pub fn parse_optional_timestamp(input: Option<&String>) -> AppResult<Option<DateTime<Utc>>> {
    input.map(|s| parse_timestamp(s)).transpose()
}

/// Current instant truncated to whole seconds, the storage resolution.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::seconds(1)).unwrap_or(now)
}

/// Storage / export representation.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Whole seconds in `[start, end)`; `None` when the span is empty or inverted.
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<i64> {
    let secs = end.signed_duration_since(start).num_seconds();
    (secs > 0).then_some(secs)
}

/// Offset east of UTC. `None` means the system's current local offset.
pub fn resolve_offset(minutes: Option<i32>) -> AppResult<FixedOffset> {
    match minutes {
        Some(m) => FixedOffset::east_opt(m * 60)
            .ok_or_else(|| AppError::Config(format!("UTC offset out of range: {m} minutes"))),
        None => Ok(Local::now().offset().fix()),
    }
}

/// Render a UTC instant in the given local offset, e.g. `%Y-%m-%d %H:%M`.
pub fn format_local(dt: &DateTime<Utc>, offset: FixedOffset, fmt: &str) -> String {
    dt.with_timezone(&offset).format(fmt).to_string()
}

/// `HH:MM:SS`, hours unbounded.
pub fn format_hms(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// `42s`, `12m`, `1h 5m`.
pub fn format_short(seconds: i64) -> String {
    let s = seconds.max(0);
    let hours = s / 3600;
    let minutes = (s % 3600) / 60;
    if s < 60 {
        format!("{s}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
