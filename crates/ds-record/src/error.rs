//! Error types for ds-record.

use thiserror::Error;

/// Errors that can occur while writing recorded output.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Alias for `Result<T, RecordError>`.
pub type RecordResult<T> = Result<T, RecordError>;
