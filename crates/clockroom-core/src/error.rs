//! Error types for clockroom-core, one enum per concern.
//!
//! Most of these never reach the user: the session engine converts them
//! into log lines and falls back to simulated or in-memory behaviour.
//! The CLI is the only place that reports them verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Key/value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read or write against the store failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The store refused the write (quota, disabled storage)
    #[error("Write rejected for '{key}': {message}")]
    WriteRejected { key: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The data directory could not be created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Notification audio errors.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No output device / audio context available
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),

    /// The platform refused playback (e.g. before a user gesture)
    #[error("Playback blocked: {0}")]
    Blocked(String),
}

/// Fullscreen platform errors.
#[derive(Error, Debug)]
pub enum FullscreenError {
    /// This API variant does not exist on the platform
    #[error("Fullscreen API '{0}' is not supported")]
    Unsupported(String),
}

/// Weather lookup errors.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// HTTP transport failure
    #[error("Weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Bad base URL or coordinates
    #[error("Invalid weather URL: {0}")]
    Url(#[from] url::ParseError),

    /// Upstream answered with a non-success status
    #[error("Weather service returned status {status}")]
    Status { status: u16 },

    /// Response did not contain current conditions
    #[error("Weather response missing current conditions")]
    MissingData,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseBusy => {
                StorageError::Locked
            }
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn busy_and_locked_map_to_locked() {
        let busy = StorageError::from(sqlite_failure(rusqlite::ffi::SQLITE_BUSY));
        let locked = StorageError::from(sqlite_failure(rusqlite::ffi::SQLITE_LOCKED));
        assert!(matches!(busy, StorageError::Locked));
        assert!(matches!(locked, StorageError::Locked));
    }

    #[test]
    fn other_sqlite_failures_keep_their_message() {
        let err = StorageError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StorageError::QueryFailed(ref m) if m.contains("no rows")));
    }
}
