//! Error types for system construction.

use thiserror::Error;

use oldspot_trace::TraceError;

/// Result type for system operations.
pub type Result<T> = std::result::Result<T, SystemError>;

/// Errors that can occur while loading a chip description and building the
/// failure-dependency tree.
#[derive(Debug, Error)]
pub enum SystemError {
    /// I/O error reading the manifest.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or does not match the schema.
    #[error("failed to parse chip description: {0}")]
    Parse(String),

    /// A trace file could not be read.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Two units share a name.
    #[error("duplicate unit name {name:?}")]
    DuplicateUnit { name: String },

    /// A group references a unit that is not in the registry.
    #[error("group {group:?} references unknown unit {unit:?}")]
    UnknownUnit { group: String, unit: String },
}
