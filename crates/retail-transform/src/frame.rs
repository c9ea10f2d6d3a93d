//! DataFrame access and row filtering shared by every stage.
//!
//! Stages read their inputs column by column into plain vectors, decide per
//! row, and rebuild a new frame. Inputs are never mutated in place.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, BooleanChunked, Column, DataFrame, DataType, NewChunkedArray};
use retail_common::{any_to_f64, any_to_i64, any_to_string};
use retail_model::Table;

use crate::error::{Result, TransformError};

/// Returns `name` from `df`, or a `MissingColumn` error attributed to `table`.
pub fn require_column<'a>(df: &'a DataFrame, table: Table, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| TransformError::MissingColumn {
            table,
            column: name.to_string(),
        })
}

/// Reads a column as optional strings. Non-string columns are cast first.
pub fn string_values(df: &DataFrame, table: Table, name: &str) -> Result<Vec<Option<String>>> {
    let column = require_column(df, table, name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Reads a column as exact integers; non-integral cells become `None`.
pub fn int_values(df: &DataFrame, table: Table, name: &str) -> Result<Vec<Option<i64>>> {
    let column = require_column(df, table, name)?;
    Ok((0..df.height())
        .map(|idx| any_to_i64(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Reads a numeric column as `f64`; non-numeric cells become `None`.
pub fn float_values(df: &DataFrame, table: Table, name: &str) -> Result<Vec<Option<f64>>> {
    let column = require_column(df, table, name)?;
    Ok((0..df.height())
        .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Keeps the rows whose flag is `true`, preserving order.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Drops rows in which every cell is null.
pub fn drop_all_null_rows(df: &DataFrame) -> Result<DataFrame> {
    let mut keep = vec![false; df.height()];
    for column in df.get_columns() {
        let not_null = column.is_not_null();
        for (idx, present) in (&not_null).into_iter().enumerate() {
            if present == Some(true) {
                keep[idx] = true;
            }
        }
    }
    filter_rows(df, &keep)
}

/// Keeps the first row for each distinct value of `key`.
pub fn dedupe_by_key(df: &DataFrame, table: Table, key: &str) -> Result<DataFrame> {
    let column = require_column(df, table, key)?;
    let mut seen = BTreeSet::new();
    let keep: Vec<bool> = (0..df.height())
        .map(|idx| seen.insert(any_to_string(column.get(idx).unwrap_or(AnyValue::Null))))
        .collect();
    filter_rows(df, &keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("id".into(), vec![Some(1i64), None, Some(1), Some(2)]).into_column(),
            Series::new("name".into(), vec![Some("a"), None, Some("b"), None]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_all_null_rows() {
        let df = drop_all_null_rows(&sample()).unwrap();
        assert_eq!(df.height(), 3);
        let ids = int_values(&df, Table::Customers, "id").unwrap();
        assert_eq!(ids, vec![Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let df = drop_all_null_rows(&sample()).unwrap();
        let df = dedupe_by_key(&df, Table::Customers, "id").unwrap();
        let names = string_values(&df, Table::Customers, "name").unwrap();
        assert_eq!(names, vec![Some("a".to_string()), None]);
    }

    #[test]
    fn test_missing_column_names_table() {
        let err = string_values(&sample(), Table::Products, "precio_base").unwrap_err();
        assert!(matches!(
            err,
            TransformError::MissingColumn { table: Table::Products, ref column } if column == "precio_base"
        ));
    }

    #[test]
    fn test_string_values_casts_numbers() {
        let values = string_values(&sample(), Table::Customers, "id").unwrap();
        assert_eq!(values[0].as_deref(), Some("1"));
        assert_eq!(values[1], None);
    }
}
