//! Error types for the transformation stages.

use polars::prelude::PolarsError;
use retail_model::Table;
use thiserror::Error;

/// Fatal transformation failures. Row-level problems never surface here;
/// they are defaulted or filtered inside each stage.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A stage input lacks a column it needs.
    #[error("{table}: required column '{column}' not found")]
    MissingColumn { table: Table, column: String },

    /// A sales row carries a branch id that cannot be read as a number.
    #[error("sales row {row}: branch id '{value}' cannot be coerced to an integer")]
    BranchIdCoercion { row: usize, value: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
