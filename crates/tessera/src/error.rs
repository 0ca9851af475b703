//! Error types for the Tessera library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tessera operations.
#[derive(Debug, Error)]
pub enum TesseraError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed record in a target list or annotation file.
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    /// A knowledge-base lookup failed (transport, timeout, or bad response).
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Error saving or loading persisted state (cache, summaries).
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Tessera operations.
pub type Result<T> = std::result::Result<T, TesseraError>;
