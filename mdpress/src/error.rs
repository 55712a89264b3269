//! Error types for format, font and history operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Operation not offered by the format
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Errors loading or embedding fonts for paginated output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FontError {
    #[error("no usable font found")]
    NoFonts,
    #[error("cannot load font file '{}': {message}", .path.display())]
    Load { path: PathBuf, message: String },
    #[error("font '{name}' cannot be read: {message}")]
    Parse { name: String, message: String },
    #[error("font '{name}' cannot be subset: {message}")]
    Subset { name: String, message: String },
}

impl From<FontError> for FormatError {
    fn from(err: FontError) -> Self {
        FormatError::SerializationError(err.to_string())
    }
}

/// Failures of a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the history store.
///
/// The in-memory collection is always left consistent; these only report that
/// the durable copy could not be read or written.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history unavailable: {0}")]
    Unavailable(#[from] StorageError),
    #[error("history unavailable: could not encode history: {0}")]
    Encode(#[from] serde_json::Error),
}
