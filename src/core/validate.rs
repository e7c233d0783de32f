//! Validation predicate gating the "overwrite" action.

use crate::core::resolve::{Window, resolve};
use crate::errors::{AppError, AppResult, ValidationError};
use crate::models::interval::Interval;
use crate::utils::time::parse_time_of_day;
use chrono::{DateTime, FixedOffset, Utc};

/// Check an edit request and return the absolute window it resolves to.
///
/// Every recoverable failure maps to a distinct [`ValidationError`];
/// precondition violations from the resolver are passed through unchanged.
pub fn check_edit(
    category: Option<&str>,
    from: &str,
    to: &str,
    existing: &[Interval],
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> AppResult<Window> {
    if category.is_none_or(|c| c.trim().is_empty()) {
        return Err(ValidationError::NoCategory.into());
    }

    if parse_time_of_day(from).is_none() || parse_time_of_day(to).is_none() {
        return Err(ValidationError::InvalidFormat.into());
    }

    let (start, end) =
        resolve(from, to, existing, offset, now)?.ok_or(ValidationError::InvalidRange)?;

    if end <= start {
        return Err(ValidationError::EndNotAfterStart.into());
    }

    if end > now {
        return Err(ValidationError::EndInFuture.into());
    }

    Ok((start, end))
}

/// `"ok"` when the edit may be committed, otherwise the reason to show.
pub fn edit_verdict(
    category: Option<&str>,
    from: &str,
    to: &str,
    existing: &[Interval],
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> String {
    match check_edit(category, from, to, existing, offset, now) {
        Ok(_) => "ok".to_string(),
        Err(AppError::Validation(v)) => v.message().to_string(),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Vec<Interval> {
        let mut i = Interval::start_running("s", "read", "2024-06-01T08:00:00Z".parse().unwrap());
        i.end = Some("2024-06-01T09:00:00Z".parse().unwrap());
        vec![i]
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn each_failure_has_its_own_message() {
        let ivs = session();
        let now = Utc::now();
        assert_eq!(
            edit_verdict(None, "08:00", "08:30", &ivs, utc(), now),
            "Select a time box"
        );
        assert_eq!(
            edit_verdict(Some("  "), "08:00", "08:30", &ivs, utc(), now),
            "Select a time box"
        );
        assert_eq!(
            edit_verdict(Some("code"), "8:00", "08:30", &ivs, utc(), now),
            "Use HH:MM for both times"
        );
        assert_eq!(
            edit_verdict(Some("code"), "13:00", "14:00", &ivs, utc(), now),
            "Invalid time range"
        );
        assert_eq!(
            edit_verdict(Some("code"), "08:15", "08:30", &ivs, utc(), now),
            "ok"
        );
    }

    #[test]
    fn window_ending_after_now_is_refused() {
        let ivs = session();
        let now: DateTime<Utc> = "2024-06-01T08:40:00Z".parse().unwrap();
        assert_eq!(
            edit_verdict(Some("code"), "08:15", "08:45", &ivs, utc(), now),
            "End cannot be later than now"
        );
        assert!(check_edit(Some("code"), "08:15", "08:40", &ivs, utc(), now).is_ok());
    }

    #[test]
    fn missing_intervals_surface_as_precondition() {
        let err = check_edit(Some("code"), "08:00", "09:00", &[], utc(), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
    }
}
