//! Error types for output writing and loading.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A written artifact did not read back as expected.
    #[error("output {path} is not readable as written: expected {expected} rows, found {found}")]
    Unreadable {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("failed to write manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("constraint script {script} failed: {message}")]
    ConstraintScript { script: String, message: String },

    /// Raised after every constraint script was attempted.
    #[error("{} constraint script(s) failed: {}", failed.len(), failed.join(", "))]
    ConstraintsFailed { failed: Vec<String> },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for OutputError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
