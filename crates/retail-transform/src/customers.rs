//! Customer dimension cleaning.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use retail_model::schema::customers;
use retail_model::{Gender, Table};
use tracing::debug;

use crate::error::Result;
use crate::frame::{dedupe_by_key, drop_all_null_rows, string_values};
use crate::ids::reconcile_ids;
use crate::normalization::{normalize_age, title_case_values};

/// Cleans the raw customer extract.
///
/// Order: drop empty rows, reconcile ids, then age, gender, location and name,
/// and finally keep the first row per id.
pub fn clean_customers(raw: &DataFrame) -> Result<DataFrame> {
    let table = Table::Customers;
    let df = drop_all_null_rows(raw)?;

    let ids = reconcile_ids(&string_values(&df, table, customers::ID)?, 1);
    let ages: Vec<i64> = string_values(&df, table, customers::AGE)?
        .iter()
        .map(|value| normalize_age(value.as_deref()))
        .collect();
    let genders: Vec<&str> = string_values(&df, table, customers::GENDER)?
        .iter()
        .map(|value| Gender::from_code(value.as_deref()).as_str())
        .collect();
    let locations = title_case_values(string_values(&df, table, customers::LOCATION)?);
    let names = title_case_values(string_values(&df, table, customers::NAME)?);

    let cleaned = DataFrame::new(vec![
        Series::new(customers::ID.into(), ids).into_column(),
        Series::new(customers::NAME.into(), names).into_column(),
        Series::new(customers::AGE.into(), ages).into_column(),
        Series::new(customers::GENDER.into(), genders).into_column(),
        Series::new(customers::LOCATION.into(), locations).into_column(),
    ])?;
    let cleaned = dedupe_by_key(&cleaned, table, customers::ID)?;

    debug!(
        table = %table,
        rows_in = raw.height(),
        empty_rows = raw.height() - df.height(),
        rows_out = cleaned.height(),
        "cleaned customers"
    );
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::int_values;

    fn raw_customers() -> DataFrame {
        DataFrame::new(vec![
            Series::new(
                "cliente_id".into(),
                vec![Some("3"), Some("3"), None, Some("x"), Some("1")],
            )
            .into_column(),
            Series::new(
                "nombre".into(),
                vec![Some("ana LOPEZ"), Some("luis  diaz"), None, Some("eva"), None],
            )
            .into_column(),
            Series::new(
                "edad".into(),
                vec![Some("150"), Some("7"), None, Some("45"), Some("abc")],
            )
            .into_column(),
            Series::new(
                "genero".into(),
                vec![Some("m"), Some("f"), None, Some("X"), None],
            )
            .into_column(),
            Series::new(
                "ubicacion".into(),
                vec![Some("lima norte"), None, None, Some("CUSCO"), Some("arequipa")],
            )
            .into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_clean_customers() {
        let df = clean_customers(&raw_customers()).unwrap();
        assert_eq!(df.height(), 4);

        let ids = int_values(&df, Table::Customers, "cliente_id").unwrap();
        assert_eq!(ids, vec![Some(3), Some(2), Some(4), Some(1)]);

        let ages = int_values(&df, Table::Customers, "edad").unwrap();
        assert_eq!(ages, vec![Some(15), Some(18), Some(45), Some(18)]);

        let genders = df.column("genero").unwrap().str().unwrap();
        assert_eq!(genders.get(0), Some("Masculino"));
        assert_eq!(genders.get(1), Some("Femenino"));
        assert_eq!(genders.get(2), Some("Otro"));
        assert_eq!(genders.get(3), Some("Otro"));

        let names = df.column("nombre").unwrap().str().unwrap();
        assert_eq!(names.get(0), Some("Ana Lopez"));
        assert_eq!(names.get(1), Some("Luis Diaz"));
        assert_eq!(names.get(3), None);

        let locations = df.column("ubicacion").unwrap().str().unwrap();
        assert_eq!(locations.get(0), Some("Lima Norte"));
        assert_eq!(locations.get(2), Some("Cusco"));
    }

    #[test]
    fn test_column_order() {
        let df = clean_customers(&raw_customers()).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, customers::ALL.to_vec());
    }
}
