//! Fixed-width rendering of surrogate keys.
//!
//! The warehouse keys every table by zero-padded strings, so all id columns
//! share one textual form regardless of magnitude.

use polars::prelude::{DataFrame, NamedFrom, Series};
use retail_model::Table;

use crate::error::Result;
use crate::frame::string_values;

pub const DEFAULT_ID_WIDTH: usize = 10;

/// Left-pads `value` with zeros to `width`. Wider values are unchanged.
///
/// ```
/// use retail_transform::format_ids::pad_id;
///
/// assert_eq!(pad_id("42", 10), "0000000042");
/// assert_eq!(pad_id("12345678901", 10), "12345678901");
/// ```
pub fn pad_id(value: &str, width: usize) -> String {
    format!("{value:0>width$}")
}

/// Renders every id column of `table` present in `df` as a padded string.
pub fn format_identifiers(df: &DataFrame, table: Table, width: usize) -> Result<DataFrame> {
    let mut formatted = df.clone();
    for column in table.id_columns() {
        if df.column(column).is_err() {
            continue;
        }
        let padded: Vec<Option<String>> = string_values(df, table, column)?
            .into_iter()
            .map(|value| value.map(|v| pad_id(&v, width)))
            .collect();
        formatted.with_column(Series::new(column.into(), padded))?;
    }
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::IntoColumn;

    #[test]
    fn test_format_identifiers_only_touches_ids() {
        let df = DataFrame::new(vec![
            Series::new("envio_id".into(), vec![1i64, 25]).into_column(),
            Series::new("venta_id".into(), vec![3i64, 4]).into_column(),
            Series::new("proveedor_id".into(), vec![7i64, 8]).into_column(),
            Series::new("estado_envio".into(), vec!["Entregado", "Cancelado"]).into_column(),
            Series::new("tiempo_id".into(), vec![1i64, 2]).into_column(),
        ])
        .unwrap();

        let out = format_identifiers(&df, Table::Shipments, 10).unwrap();
        let ids = out.column("envio_id").unwrap().str().unwrap();
        assert_eq!(ids.get(1), Some("0000000025"));
        let time_ids = out.column("tiempo_id").unwrap().str().unwrap();
        assert_eq!(time_ids.get(0), Some("0000000001"));
        let statuses = out.column("estado_envio").unwrap().str().unwrap();
        assert_eq!(statuses.get(0), Some("Entregado"));
        let names: Vec<&str> = out.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["envio_id", "venta_id", "proveedor_id", "estado_envio", "tiempo_id"]
        );
    }

    #[test]
    fn test_custom_width() {
        assert_eq!(pad_id("7", 4), "0007");
        assert_eq!(pad_id("", 3), "000");
    }
}
