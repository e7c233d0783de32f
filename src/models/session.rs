use chrono::{DateTime, Utc};
use serde::Serialize;

/// One continuous period of tracking, composed of intervals and breaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: String,
    /// Unset until the first interval begins.
    pub start: Option<DateTime<Utc>>,
    /// Unset while the session is active.
    pub end: Option<DateTime<Utc>>,
    /// Cached duration in seconds.
    pub duration: i64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start: None,
            end: None,
            duration: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Find a session by id, or by its 1-based number in `sessions`.
///
/// Returns the number alongside the session.
pub fn find_session<'a>(sessions: &'a [Session], reference: &str) -> Option<(usize, &'a Session)> {
    let r = reference.trim();
    if let Some(pos) = sessions.iter().position(|s| s.id == r) {
        return Some((pos + 1, &sessions[pos]));
    }
    let n: usize = r.parse().ok()?;
    let s = sessions.get(n.checked_sub(1)?)?;
    Some((n, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_or_number() {
        let sessions = vec![Session::new(), Session::new()];
        assert_eq!(find_session(&sessions, "2").unwrap().1.id, sessions[1].id);
        assert_eq!(find_session(&sessions, &sessions[0].id).unwrap().0, 1);
        assert!(find_session(&sessions, "0").is_none());
        assert!(find_session(&sessions, "3").is_none());
        assert!(find_session(&sessions, "abc").is_none());
    }
}
