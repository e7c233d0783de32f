//! Time-window resolution.
//!
//! Users type a time-of-day pair without a date. The window is anchored to
//! the day the session started and, when that does not touch the session's
//! actual span, to the day before or the day after.

use crate::errors::{AppError, AppResult};
use crate::models::interval::Interval;
use crate::utils::time::parse_time_of_day;
use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

pub type Window = (DateTime<Utc>, DateTime<Utc>);

/// Day shifts tried in order: same day, previous day, next day.
const DAY_SHIFTS: [i64; 3] = [0, -1, 1];

/// Resolve `from`/`to` (`HH:MM`, local time at `offset`) against the span
/// of `existing`.
///
/// Returns `Ok(None)` when a time does not parse or no day shift makes the
/// window overlap the session. Calling this without any interval is a
/// programming error.
pub fn resolve(
    from: &str,
    to: &str,
    existing: &[Interval],
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> AppResult<Option<Window>> {
    let (first_start, last_end) = span(existing, now).ok_or_else(|| {
        AppError::Precondition("cannot resolve a time window for a session without intervals".into())
    })?;

    let (Some(from_t), Some(to_t)) = (parse_time_of_day(from), parse_time_of_day(to)) else {
        return Ok(None);
    };

    let anchor = first_start.date_naive();

    for shift in DAY_SHIFTS {
        let Some((start, end)) = anchored(anchor, shift, from_t, to_t, offset) else {
            continue;
        };
        if start <= last_end && end >= first_start {
            return Ok(Some((start, end)));
        }
    }

    Ok(None)
}

/// `(min start, max effective end)` of a session's intervals.
pub fn span(existing: &[Interval], now: DateTime<Utc>) -> Option<Window> {
    let first_start = existing.iter().map(|i| i.start).min()?;
    let last_end = existing.iter().map(|i| i.effective_end(now)).max()?;
    Some((first_start, last_end))
}

/// Candidate window on `anchor + shift` days; an end at or before the start
/// rolls over to the next day.
fn anchored(
    anchor: NaiveDate,
    shift: i64,
    from: NaiveTime,
    to: NaiveTime,
    offset: FixedOffset,
) -> Option<Window> {
    let day = shift_days(anchor, shift)?;
    let start = to_utc(day, from, offset)?;
    let mut end = to_utc(day, to, offset)?;
    if end <= start {
        end = end.checked_add_days(Days::new(1))?;
    }
    Some((start, end))
}

fn shift_days(date: NaiveDate, shift: i64) -> Option<NaiveDate> {
    let days = Days::new(shift.unsigned_abs());
    if shift < 0 {
        date.checked_sub_days(days)
    } else {
        date.checked_add_days(days)
    }
}

fn to_utc(day: NaiveDate, time: NaiveTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&day.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
