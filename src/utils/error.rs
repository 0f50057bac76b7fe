//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while building a cell partition
#[derive(Error, Debug)]
pub enum CellError {
    #[error("Invalid cell delimiter pattern `{pattern}`: {source}")]
    InvalidDelimiter {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    #[error("No cell delimiter patterns configured")]
    NoDelimiters,

    #[error("Delimiter search failed: {0}")]
    SearchFailed(#[from] Box<fancy_regex::Error>),
}

impl From<fancy_regex::Error> for CellError {
    fn from(err: fancy_regex::Error) -> Self {
        CellError::SearchFailed(Box::new(err))
    }
}

/// Errors reported by an execution dispatcher for a single cell
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Evaluation of cell {cell_id} failed: {message}")]
    EvaluationFailed { cell_id: usize, message: String },

    #[error("Execution backend is not available")]
    Unavailable,
}

/// Errors that can occur while loading profiler samples
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read profile: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Profile contains no threads")]
    EmptyProfile,

    #[error("Unknown thread: {0}")]
    UnknownThread(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
