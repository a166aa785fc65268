/// Error types shared across the crate
///
/// The preheat window itself never fails; errors only surface from
/// index lookups, the SQLite catalog and the settings file.
use thiserror::Error;

/// Lookup failures on the ordered item index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Position outside `[0, count)`
    #[error("position {position} out of range for {count} items")]
    OutOfRange { position: usize, count: usize },
}

/// Failures from the photo catalog
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("catalog database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored creation time that chrono cannot represent
    #[error("invalid creation timestamp {0} for {1}")]
    InvalidTimestamp(i64, String),

    #[error("could not determine user data directory")]
    NoDataDir,
}

/// Failures loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not determine user config directory")]
    NoConfigDir,
}
