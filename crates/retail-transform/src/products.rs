//! Product dimension cleaning.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use retail_model::Table;
use retail_model::schema::products;
use tracing::debug;

use crate::error::Result;
use crate::frame::{dedupe_by_key, drop_all_null_rows, string_values};
use crate::ids::reconcile_ids;
use crate::normalization::{normalize_price, title_case_values};

/// Cleans the raw product extract: ids, name, category, price, then dedupe.
pub fn clean_products(raw: &DataFrame) -> Result<DataFrame> {
    let table = Table::Products;
    let df = drop_all_null_rows(raw)?;

    let ids = reconcile_ids(&string_values(&df, table, products::ID)?, 1);
    let names = title_case_values(string_values(&df, table, products::NAME)?);
    let categories = title_case_values(string_values(&df, table, products::CATEGORY)?);
    let prices: Vec<f64> = string_values(&df, table, products::BASE_PRICE)?
        .iter()
        .map(|value| normalize_price(value.as_deref()))
        .collect();

    let cleaned = DataFrame::new(vec![
        Series::new(products::ID.into(), ids).into_column(),
        Series::new(products::NAME.into(), names).into_column(),
        Series::new(products::CATEGORY.into(), categories).into_column(),
        Series::new(products::BASE_PRICE.into(), prices).into_column(),
    ])?;
    let cleaned = dedupe_by_key(&cleaned, table, products::ID)?;

    debug!(
        table = %table,
        rows_in = raw.height(),
        rows_out = cleaned.height(),
        "cleaned products"
    );
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{float_values, int_values};

    #[test]
    fn test_clean_products() {
        let raw = DataFrame::new(vec![
            Series::new("producto_id".into(), vec![Some("10"), Some("2.5"), None]).into_column(),
            Series::new(
                "nombre_producto".into(),
                vec![Some(" laptop PRO "), Some("mouse"), None],
            )
            .into_column(),
            Series::new(
                "categoria".into(),
                vec![Some("tecnología  portátil"), None, None],
            )
            .into_column(),
            Series::new("precio_base".into(), vec![Some("1200.456"), Some("n/a"), None])
                .into_column(),
        ])
        .unwrap();

        let df = clean_products(&raw).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            int_values(&df, Table::Products, "producto_id").unwrap(),
            vec![Some(10), Some(1)]
        );
        assert_eq!(
            float_values(&df, Table::Products, "precio_base").unwrap(),
            vec![Some(1200.46), Some(0.0)]
        );
        let names = df.column("nombre_producto").unwrap().str().unwrap();
        assert_eq!(names.get(0), Some("Laptop Pro"));
        let categories = df.column("categoria").unwrap().str().unwrap();
        assert_eq!(categories.get(0), Some("Tecnología Portátil"));
        assert_eq!(categories.get(1), None);
    }
}
