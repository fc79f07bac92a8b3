//! Error types for the Roster library.

use std::path::PathBuf;
use thiserror::Error;

use crate::dataset::Dataset;

/// Main error type for Roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (missing credentials, bad client setup).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The text-generation service could not be reached or answered with an error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The text-generation service answered, but not with the structure we asked for.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// A rule is missing fields or violates its kind's shape.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Dataset name is not one of clients, workers, tasks.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Column is not part of the dataset's header.
    #[error("Unknown column '{column}' in {dataset}")]
    UnknownColumn { dataset: Dataset, column: String },

    /// Row index past the end of the dataset.
    #[error("Row {row} out of range for {dataset} ({len} rows)")]
    RowOutOfRange {
        dataset: Dataset,
        row: usize,
        len: usize,
    },
}

/// Result type alias for Roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
