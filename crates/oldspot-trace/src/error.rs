//! Error types for trace parsing.

use thiserror::Error;

/// Result type for trace operations.
pub type Result<T> = std::result::Result<T, TraceError>;

/// Errors that can occur while reading a trace file.
#[derive(Debug, Error)]
pub enum TraceError {
    /// I/O error opening or reading the file.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is empty or has no header row.
    #[error("{path}: missing header row")]
    MissingHeader { path: String },

    /// A data row has a different number of fields than the header.
    #[error("{path}:{line}: expected {expected} fields, found {found}")]
    FieldCount {
        path: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A field could not be parsed as a number.
    #[error("{path}:{line}: invalid number {token:?}")]
    InvalidNumber {
        path: String,
        line: usize,
        token: String,
    },
}
