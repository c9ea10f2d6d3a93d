//! Sales fact reconciliation.
//!
//! Sales are the first fact table: every foreign key is checked against the
//! cleaned dimensions and every surviving row gets a `tiempo_id`. Rows that
//! cannot be resolved are dropped, never defaulted.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use retail_common::{parse_exact_int, parse_f64, parse_truncated_int, round_to_cents};
use retail_model::Table;
use retail_model::schema::{customers, products, sales};
use tracing::{debug, warn};

use crate::datetime::parse_strict;
use crate::error::{Result, TransformError};
use crate::frame::{drop_all_null_rows, float_values, int_values, string_values};
use crate::ids::reconcile_ids;
use crate::time_dim::TimeLookup;

/// Cleaned product ids plus a fallback index from truncated price to ids.
///
/// The fallback is lossy: several products can share a truncated price, in
/// which case the first product in cleaned-table order wins.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    ids: BTreeSet<i64>,
    by_price: BTreeMap<i64, Vec<i64>>,
}

impl ProductCatalog {
    pub fn from_products(products_df: &DataFrame) -> Result<Self> {
        let table = Table::Products;
        let ids = int_values(products_df, table, products::ID)?;
        let prices = float_values(products_df, table, products::BASE_PRICE)?;

        let mut catalog = Self::default();
        for (id, price) in ids.into_iter().zip(prices) {
            let Some(id) = id else { continue };
            catalog.ids.insert(id);
            if let Some(price) = price {
                catalog.by_price.entry(price.trunc() as i64).or_default().push(id);
            }
        }
        Ok(catalog)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Keeps a known product id, otherwise falls back to the unit price.
    pub fn resolve(&self, candidate: Option<i64>, unit_price: Option<f64>) -> Option<i64> {
        if let Some(id) = candidate.filter(|id| self.contains(*id)) {
            return Some(id);
        }
        let price = unit_price?.trunc() as i64;
        self.by_price.get(&price).and_then(|ids| ids.first()).copied()
    }
}

#[derive(Debug, Default)]
struct Dropped {
    bad_date: usize,
    unknown_product: usize,
    unknown_customer: usize,
    bad_total: usize,
    unmatched_time: usize,
}

/// Reconciles the raw sales extract against the cleaned dimensions.
///
/// Fails only when a surviving row carries a branch id that is not numeric.
pub fn reconcile_sales(
    raw: &DataFrame,
    products_df: &DataFrame,
    customers_df: &DataFrame,
    time: &TimeLookup,
) -> Result<DataFrame> {
    let table = Table::Sales;
    let catalog = ProductCatalog::from_products(products_df)?;
    let customer_ids: BTreeSet<i64> = int_values(customers_df, Table::Customers, customers::ID)?
        .into_iter()
        .flatten()
        .collect();

    let df = drop_all_null_rows(raw)?;
    let ids = reconcile_ids(&string_values(&df, table, sales::ID)?, 1);
    let dates = string_values(&df, table, sales::DATE)?;
    let product_ids = string_values(&df, table, sales::PRODUCT_ID)?;
    let unit_prices = string_values(&df, table, sales::UNIT_PRICE)?;
    let customer_cells = string_values(&df, table, sales::CUSTOMER_ID)?;
    let branches = string_values(&df, table, sales::BRANCH_ID)?;
    let quantities = string_values(&df, table, sales::QUANTITY)?;

    let mut out_ids = Vec::new();
    let mut out_products = Vec::new();
    let mut out_quantities = Vec::new();
    let mut out_prices = Vec::new();
    let mut out_customers = Vec::new();
    let mut out_branches = Vec::new();
    let mut out_totals = Vec::new();
    let mut out_times = Vec::new();
    let mut dropped = Dropped::default();

    for row in 0..df.height() {
        let Some(timestamp) = dates[row].as_deref().and_then(parse_strict) else {
            dropped.bad_date += 1;
            continue;
        };

        let unit_price = unit_prices[row].as_deref().and_then(parse_f64);
        let product_candidate = product_ids[row].as_deref().and_then(parse_exact_int);
        let Some(product_id) = catalog.resolve(product_candidate, unit_price) else {
            dropped.unknown_product += 1;
            continue;
        };

        let customer_id = customer_cells[row]
            .as_deref()
            .and_then(parse_exact_int)
            .filter(|id| customer_ids.contains(id));
        let Some(customer_id) = customer_id else {
            dropped.unknown_customer += 1;
            continue;
        };

        let branch_cell = branches[row].as_deref();
        let branch_id = branch_cell.and_then(parse_truncated_int).ok_or_else(|| {
            TransformError::BranchIdCoercion {
                row,
                value: branch_cell.unwrap_or("<null>").to_string(),
            }
        })?;

        let quantity = quantities[row]
            .as_deref()
            .and_then(parse_truncated_int)
            .unwrap_or(0);
        let total = round_to_cents(quantity as f64 * unit_price.unwrap_or(f64::NAN));
        // Non-finite totals fail the comparison with themselves.
        if round_to_cents(total) != total {
            dropped.bad_total += 1;
            continue;
        }

        let Some(time_id) = time.resolve(timestamp) else {
            debug!(sale_id = ids[row], timestamp = %timestamp, "no tiempo_id for sale");
            dropped.unmatched_time += 1;
            continue;
        };

        out_ids.push(ids[row]);
        out_products.push(product_id);
        out_quantities.push(quantity);
        out_prices.push(round_to_cents(unit_price.unwrap_or_default()));
        out_customers.push(customer_id);
        out_branches.push(branch_id);
        out_totals.push(total);
        out_times.push(time_id);
    }

    report_drops(raw.height(), df.height(), out_ids.len(), &dropped);

    Ok(DataFrame::new(vec![
        Series::new(sales::ID.into(), out_ids).into_column(),
        Series::new(sales::PRODUCT_ID.into(), out_products).into_column(),
        Series::new(sales::QUANTITY.into(), out_quantities).into_column(),
        Series::new(sales::UNIT_PRICE.into(), out_prices).into_column(),
        Series::new(sales::CUSTOMER_ID.into(), out_customers).into_column(),
        Series::new(sales::BRANCH_ID.into(), out_branches).into_column(),
        Series::new(sales::TOTAL.into(), out_totals).into_column(),
        Series::new(sales::TIME_ID.into(), out_times).into_column(),
    ])?)
}

fn report_drops(rows_in: usize, non_empty: usize, rows_out: usize, dropped: &Dropped) {
    let counts = [
        ("empty row", rows_in - non_empty),
        ("unparseable date", dropped.bad_date),
        ("unresolved product", dropped.unknown_product),
        ("unknown customer", dropped.unknown_customer),
        ("invalid total", dropped.bad_total),
        ("unmatched time", dropped.unmatched_time),
    ];
    for (reason, count) in counts {
        if count > 0 {
            warn!(table = %Table::Sales, reason, count, "dropped sales rows");
        }
    }
    debug!(rows_in, rows_out, "reconciled sales");
}
