//! Atomic CSV writing of the finished tables.
//!
//! Each table is written to a hidden temporary sibling, flushed, and renamed
//! into place. The renamed file is then read back and checksummed before the
//! artifact is handed to anything downstream.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, DataFrame};
use retail_common::any_to_string;
use retail_model::Table;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checksum::compute_file_sha256;
use crate::error::{OutputError, Result};

/// A written, confirmed output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub table: Table,
    pub path: PathBuf,
    pub rows: usize,
    pub sha256: String,
}

/// Renders one cell. Floating-point columns only hold money and keep two decimals.
fn render_cell(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Float64(v) => format!("{v:.2}"),
        AnyValue::Float32(v) => format!("{v:.2}"),
        other => any_to_string(other),
    }
}

/// Writes `df` as `table`'s output file in `output_dir`.
pub fn write_table_csv(df: &DataFrame, table: Table, output_dir: &Path) -> Result<OutputArtifact> {
    fs::create_dir_all(output_dir).map_err(|source| OutputError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let path = output_dir.join(table.output_file_name());
    let tmp_path = output_dir.join(format!(".{}.tmp", table.output_file_name()));

    write_csv(df, &tmp_path)?;
    fs::rename(&tmp_path, &path).map_err(|source| OutputError::Io {
        path: path.clone(),
        source,
    })?;

    let rows = confirm_readable(&path, df.height())?;
    let sha256 = compute_file_sha256(&path)?;
    debug!(table = %table, path = %path.display(), rows, "wrote output table");

    Ok(OutputArtifact {
        table,
        path,
        rows,
        sha256,
    })
}

fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let csv_err = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;

    let names: Vec<&str> = df.get_column_names().iter().map(|name| name.as_str()).collect();
    writer.write_record(&names).map_err(csv_err)?;

    let columns = df.get_columns();
    let mut record = Vec::with_capacity(columns.len());
    for idx in 0..df.height() {
        record.clear();
        for column in columns {
            record.push(render_cell(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Re-reads a written file and checks its data row count.
pub fn confirm_readable(path: &Path, expected: usize) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    let mut found = 0;
    for record in reader.records() {
        record.map_err(|source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        found += 1;
    }
    if found != expected {
        return Err(OutputError::Unreadable {
            path: path.to_path_buf(),
            expected,
            found,
        });
    }
    Ok(found)
}
