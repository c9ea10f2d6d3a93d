//! CSV extract reading.
//!
//! Every column is loaded as a nullable `String` column. Empty cells become
//! null so that "all-null row" checks downstream see what the extract really
//! contained, and no type inference can silently reinterpret an identifier.
//!
//! Cells are trimmed on read, so codes padded with whitespace (a gender of
//! `" m"`) are matched downstream as if unpadded.

use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use retail_model::Table;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reads a CSV file with a single header row into a string-typed DataFrame.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::NoHeader {
            path: path.to_path_buf(),
        });
    }

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(record.get(idx).and_then(normalize_cell));
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(values)
        .map(|(name, cells)| Series::new(name.as_str().into(), cells).into_column())
        .collect();
    let df = DataFrame::new(columns)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read csv table"
    );
    Ok(df)
}

/// Reads the raw extract for `table` and checks that its required columns exist.
pub fn read_raw_table(path: &Path, table: Table) -> Result<DataFrame> {
    let df = read_csv_table(path)?;
    for column in table.raw_columns() {
        if df.column(column).is_err() {
            return Err(IngestError::MissingColumn {
                column: (*column).to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(df)
}
