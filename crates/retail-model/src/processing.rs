use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Row accounting for one table in a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub table: Table,
    /// Rows read from the raw extract (0 for derived tables).
    pub input_rows: usize,
    pub output_rows: usize,
    pub output_path: Option<PathBuf>,
}

impl TableSummary {
    pub fn dropped(&self) -> usize {
        self.input_rows.saturating_sub(self.output_rows)
    }
}

/// Kind of referential-integrity violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityIssueKind {
    DuplicateKey,
    DanglingReference,
    InvalidStatus,
    MissingColumn,
}

/// One integrity finding, aggregated per table and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub table: Table,
    pub column: String,
    pub kind: IntegrityIssueKind,
    pub count: usize,
    /// First offending value, for the report.
    pub example: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.issues.iter().map(|issue| issue.count).sum()
    }
}
