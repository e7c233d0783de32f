//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use std::fmt;
use std::io;
use thiserror::Error;

/// User-facing reasons an edit cannot be committed.
///
/// Each variant maps to one inline message; none of them touch storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    NoCategory,
    InvalidFormat,
    InvalidRange,
    EndNotAfterStart,
    EndInFuture,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::NoCategory => "Select a time box",
            ValidationError::InvalidFormat => "Use HH:MM for both times",
            ValidationError::InvalidRange => "Invalid time range",
            ValidationError::EndNotAfterStart => "End must be after start",
            ValidationError::EndInFuture => "End cannot be later than now",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid colour '{0}': expected #RRGGBB")]
    InvalidColour(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active session")]
    NoActiveSession,

    #[error("Time box '{0}' is hidden or deleted")]
    Inactive(String),

    #[error("Time box '{0}' already exists")]
    Duplicate(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

pub type AppResult<T> = Result<T, AppError>;
