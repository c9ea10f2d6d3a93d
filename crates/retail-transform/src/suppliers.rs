//! Supplier dimension cleaning.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use retail_model::Table;
use retail_model::schema::suppliers;
use tracing::debug;

use crate::error::Result;
use crate::frame::{dedupe_by_key, drop_all_null_rows, string_values};
use crate::ids::reconcile_ids;
use crate::normalization::{normalize_email, title_case_values};

/// Cleans the raw supplier extract: ids, name, location, contact, then dedupe.
pub fn clean_suppliers(raw: &DataFrame) -> Result<DataFrame> {
    let table = Table::Suppliers;
    let df = drop_all_null_rows(raw)?;

    let ids = reconcile_ids(&string_values(&df, table, suppliers::ID)?, 1);
    let names = title_case_values(string_values(&df, table, suppliers::NAME)?);
    let locations = title_case_values(string_values(&df, table, suppliers::LOCATION)?);
    let raw_contacts = string_values(&df, table, suppliers::CONTACT)?;
    let contacts: Vec<String> = raw_contacts
        .iter()
        .map(|value| normalize_email(value.as_deref()))
        .collect();
    let replaced = contacts
        .iter()
        .zip(&raw_contacts)
        .filter(|(clean, raw)| raw.as_deref() != Some(clean.as_str()))
        .count();

    let cleaned = DataFrame::new(vec![
        Series::new(suppliers::ID.into(), ids).into_column(),
        Series::new(suppliers::NAME.into(), names).into_column(),
        Series::new(suppliers::CONTACT.into(), contacts).into_column(),
        Series::new(suppliers::LOCATION.into(), locations).into_column(),
    ])?;
    let cleaned = dedupe_by_key(&cleaned, table, suppliers::ID)?;

    debug!(
        table = %table,
        rows_in = raw.height(),
        rows_out = cleaned.height(),
        contacts_replaced = replaced,
        "cleaned suppliers"
    );
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::PLACEHOLDER_EMAIL;

    #[test]
    fn test_clean_suppliers() {
        let raw = DataFrame::new(vec![
            Series::new("proveedor_id".into(), vec![Some("1"), Some("1")]).into_column(),
            Series::new("nombre_proveedor".into(), vec![Some("acme sac"), Some("beta")])
                .into_column(),
            Series::new("contacto".into(), vec![Some("ventas@acme.com"), Some("llamar")])
                .into_column(),
            Series::new("ubicacion".into(), vec![Some("QUITO"), None]).into_column(),
        ])
        .unwrap();

        let df = clean_suppliers(&raw).unwrap();
        assert_eq!(df.height(), 2);
        let ids = df.column("proveedor_id").unwrap().i64().unwrap();
        assert_eq!(ids.get(0), Some(1));
        assert_eq!(ids.get(1), Some(2));
        let contacts = df.column("contacto").unwrap().str().unwrap();
        assert_eq!(contacts.get(0), Some("ventas@acme.com"));
        assert_eq!(contacts.get(1), Some(PLACEHOLDER_EMAIL));
        let names = df.column("nombre_proveedor").unwrap().str().unwrap();
        assert_eq!(names.get(0), Some("Acme Sac"));
    }
}
