//! Core error types for dayplanner-core.
//!
//! Rejections from user-directed scheduling operations are reported through
//! [`ScheduleError`]; storage and configuration failures have their own enums
//! and all of them fold into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayplanner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Scheduling rejections (out of window, slot occupied, unknown task)
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Rejections raised by quick-schedule, drag placement and task lookups.
///
/// None of these leave partial state behind: the task collection is only
/// written after every check has passed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Target time lies outside the applicable window
    #[error("{time} is outside the timeline window {start_hour:02}:00-{end_hour:02}:00")]
    OutOfWindow {
        time: String,
        start_hour: u32,
        end_hour: u32,
    },

    /// Target slot overlaps an active scheduled task
    #[error("slot at {time} overlaps task '{conflicting_task}'")]
    SlotOccupied {
        time: String,
        conflicting_task: String,
    },

    /// No task with the given id exists for the current user
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// A time string could not be parsed as HH:MM
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to open database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Stored value could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(StorageError::Database(err))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Storage(StorageError::Json(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
