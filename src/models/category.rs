use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// Colours offered for new time boxes, assigned round-robin.
pub const PALETTE: [&str; 8] = [
    "#77C8FF", "#FAFF07", "#FF6E3D", "#F448ED", "#6EEB4E", "#F42E2D", "#9747FF", "#FFA500",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Soft-delete marker. Deleted boxes stay in storage so historic
/// intervals keep resolving to a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CategoryStatus {
    Active,
    Deleted,
}

/// A "time box": the bucket tracked time is attributed to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBox {
    pub id: String,
    pub name: String,
    pub colour: String,
    pub visibility: Visibility,
    pub status: CategoryStatus,
}

impl TimeBox {
    pub fn new(name: &str, colour: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            colour: colour.to_string(),
            visibility: Visibility::Visible,
            status: CategoryStatus::Active,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.status, CategoryStatus::Deleted)
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.visibility, Visibility::Hidden)
    }

    /// Can be clicked to start tracking.
    pub fn is_selectable(&self) -> bool {
        !self.is_deleted() && !self.is_hidden()
    }
}

/// Validate and normalise a `#RRGGBB` colour.
pub fn parse_colour(s: &str) -> AppResult<String> {
    let t = s.trim();
    let hex = t.strip_prefix('#').unwrap_or(t);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", hex.to_ascii_uppercase()))
    } else {
        Err(AppError::InvalidColour(s.to_string()))
    }
}

/// Find a box by exact id first, then by case-insensitive name.
/// Active boxes win over deleted ones sharing the same name.
pub fn find_box<'a>(boxes: &'a [TimeBox], reference: &str) -> Option<&'a TimeBox> {
    let r = reference.trim();
    if let Some(b) = boxes.iter().find(|b| b.id == r) {
        return Some(b);
    }
    let mut by_name = boxes.iter().filter(|b| b.name.eq_ignore_ascii_case(r));
    let first = by_name.next()?;
    if !first.is_deleted() {
        return Some(first);
    }
    Some(by_name.find(|b| !b.is_deleted()).unwrap_or(first))
}
