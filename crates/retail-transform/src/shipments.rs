//! Shipment fact reconciliation.

use std::collections::BTreeSet;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use retail_common::parse_truncated_int;
use retail_model::schema::{sales, shipments, suppliers};
use retail_model::{ShipmentStatus, Table};
use tracing::{debug, warn};

use crate::datetime::parse_coercive;
use crate::error::Result;
use crate::frame::{drop_all_null_rows, int_values, string_values};
use crate::ids::reconcile_ids;
use crate::time_dim::TimeLookup;

#[derive(Debug, Default)]
struct Dropped {
    unknown_sale: usize,
    unknown_supplier: usize,
    bad_date: usize,
    bad_status: usize,
    unmatched_time: usize,
}

/// Reconciles the raw shipment extract against reconciled sales and cleaned
/// suppliers.
///
/// Foreign keys are truncated to integers before the membership check; a
/// missing key reads as 0 and never matches.
pub fn reconcile_shipments(
    raw: &DataFrame,
    sales_df: &DataFrame,
    suppliers_df: &DataFrame,
    time: &TimeLookup,
) -> Result<DataFrame> {
    let table = Table::Shipments;
    let sale_ids: BTreeSet<i64> = int_values(sales_df, Table::Sales, sales::ID)?
        .into_iter()
        .flatten()
        .collect();
    let supplier_ids: BTreeSet<i64> = int_values(suppliers_df, Table::Suppliers, suppliers::ID)?
        .into_iter()
        .flatten()
        .collect();

    let df = drop_all_null_rows(raw)?;
    let ids = reconcile_ids(&string_values(&df, table, shipments::ID)?, 1);
    let sale_cells = string_values(&df, table, shipments::SALE_ID)?;
    let supplier_cells = string_values(&df, table, shipments::SUPPLIER_ID)?;
    let statuses = string_values(&df, table, shipments::STATUS)?;
    let dates = string_values(&df, table, shipments::SHIP_DATE)?;

    let truncated = |cell: &Option<String>| cell.as_deref().and_then(parse_truncated_int).unwrap_or(0);

    let mut out_ids = Vec::new();
    let mut out_sales = Vec::new();
    let mut out_suppliers = Vec::new();
    let mut out_statuses = Vec::new();
    let mut out_times = Vec::new();
    let mut dropped = Dropped::default();

    for row in 0..df.height() {
        let sale_id = truncated(&sale_cells[row]);
        if !sale_ids.contains(&sale_id) {
            dropped.unknown_sale += 1;
            continue;
        }

        let supplier_id = truncated(&supplier_cells[row]);
        if !supplier_ids.contains(&supplier_id) {
            dropped.unknown_supplier += 1;
            continue;
        }

        let Some(shipped_at) = dates[row].as_deref().and_then(parse_coercive) else {
            dropped.bad_date += 1;
            continue;
        };

        let Some(status) = statuses[row]
            .as_deref()
            .and_then(|value| value.parse::<ShipmentStatus>().ok())
        else {
            dropped.bad_status += 1;
            continue;
        };

        let Some(time_id) = time.resolve(shipped_at) else {
            debug!(shipment_id = ids[row], timestamp = %shipped_at, "no tiempo_id for shipment");
            dropped.unmatched_time += 1;
            continue;
        };

        out_ids.push(ids[row]);
        out_sales.push(sale_id);
        out_suppliers.push(supplier_id);
        out_statuses.push(status.as_str());
        out_times.push(time_id);
    }

    let counts = [
        ("empty row", raw.height() - df.height()),
        ("unknown sale", dropped.unknown_sale),
        ("unknown supplier", dropped.unknown_supplier),
        ("unparseable date", dropped.bad_date),
        ("invalid status", dropped.bad_status),
        ("unmatched time", dropped.unmatched_time),
    ];
    for (reason, count) in counts {
        if count > 0 {
            warn!(table = %table, reason, count, "dropped shipment rows");
        }
    }
    debug!(rows_in = raw.height(), rows_out = out_ids.len(), "reconciled shipments");

    Ok(DataFrame::new(vec![
        Series::new(shipments::ID.into(), out_ids).into_column(),
        Series::new(shipments::SALE_ID.into(), out_sales).into_column(),
        Series::new(shipments::SUPPLIER_ID.into(), out_suppliers).into_column(),
        Series::new(shipments::STATUS.into(), out_statuses).into_column(),
        Series::new(shipments::TIME_ID.into(), out_times).into_column(),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_dim::build_time_dimension;

    fn raw_shipments(rows: &[[&str; 5]]) -> DataFrame {
        DataFrame::new(
            shipments::RAW
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let values: Vec<Option<String>> = rows
                        .iter()
                        .map(|row| (!row[idx].is_empty()).then(|| row[idx].to_string()))
                        .collect();
                    Series::new((*name).into(), values).into_column()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_reconcile_shipments() {
        let sales_df =
            DataFrame::new(vec![Series::new("venta_id".into(), vec![1i64, 2]).into_column()]).unwrap();
        let suppliers_df =
            DataFrame::new(vec![Series::new("proveedor_id".into(), vec![5i64]).into_column()])
                .unwrap();
        let raw = raw_shipments(&[
            ["1", "1", "5", "Entregado", "2024-02-01"],
            ["1", "2.7", "5.2", "En tránsito", "2024-02-01 00:00:45"],
            ["x", "3", "5", "Entregado", "2024-02-01"],
            ["4", "1", "", "Entregado", "2024-02-01"],
            ["5", "1", "5", "Perdido", "2024-02-01"],
            ["6", "1", "5", "entregado", "2024-02-01"],
            ["7", "1", "5", "Cancelado", "mañana"],
            ["8", "1", "5", "Retrasado", "2024-03-01"],
        ]);
        let dates = vec![Some("2024-02-01 00:00:00".to_string())];
        let time = TimeLookup::from_dimension(&build_time_dimension(&dates, &[]).unwrap()).unwrap();

        let df = reconcile_shipments(&raw, &sales_df, &suppliers_df, &time).unwrap();
        assert_eq!(df.height(), 2);

        let ids = df.column("envio_id").unwrap().i64().unwrap();
        assert_eq!(ids.get(0), Some(1));
        assert_eq!(ids.get(1), Some(2));

        let sale_ids = df.column("venta_id").unwrap().i64().unwrap();
        assert_eq!(sale_ids.get(1), Some(2));
        let supplier_ids = df.column("proveedor_id").unwrap().i64().unwrap();
        assert_eq!(supplier_ids.get(1), Some(5));

        let statuses = df.column("estado_envio").unwrap().str().unwrap();
        assert_eq!(statuses.get(1), Some("En tránsito"));
        let time_ids = df.column("tiempo_id").unwrap().i64().unwrap();
        assert_eq!(time_ids.get(0), Some(1));
    }
}
