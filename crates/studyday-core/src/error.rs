//! Core error types for studyday-core.
//!
//! Scheduling shortfalls are not errors: they are reported through the
//! plan trace. Everything here is a hard failure of a call.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyday-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid planner configuration
    #[error("Planner configuration error: {0}")]
    Plan(#[from] PlanError),

    /// Unparseable time-of-day string
    #[error("{0}")]
    TimeParse(#[from] TimeParseError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected planner configuration. Raised before any placement happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Day start ({start}) must be before day end ({end})")]
    InvalidDayWindow { start: i32, end: i32 },

    #[error("Day window {start}..{end} must lie within 0..1440 minutes")]
    DayOutOfRange { start: i32, end: i32 },

    #[error("Block size must be positive, got {0}")]
    InvalidBlockSize(i32),

    #[error("Max break must not be negative, got {0}")]
    NegativeMaxBreak(i32),
}

/// A time string the codec could not understand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Time is required")]
    Empty,

    #[error("Invalid time: {0}")]
    Invalid(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored value could not be decoded
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors for store mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange { start: i32, end: i32 },

    /// Lecture collides with one already stored for the day
    #[error("Overlaps with {course} {start}-{end}")]
    LectureOverlap { course: String, start: String, end: String },

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Lecture not found: {0}")]
    LectureNotFound(i64),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_messages_are_verbatim() {
        let err = PlanError::InvalidDayWindow { start: 600, end: 480 };
        assert_eq!(err.to_string(), "Day start (600) must be before day end (480)");
    }

    #[test]
    fn plan_error_converts_into_core_error() {
        let err: CoreError = PlanError::InvalidBlockSize(0).into();
        assert!(matches!(err, CoreError::Plan(PlanError::InvalidBlockSize(0))));
    }

    #[test]
    fn locked_database_maps_to_locked_variant() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        assert!(matches!(DatabaseError::from(err), DatabaseError::Locked));
    }
}
