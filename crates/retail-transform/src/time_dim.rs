//! Shared time dimension.
//!
//! Built from the raw sale and shipment timestamps so that both fact tables
//! key against one surrogate-time table. Fact rows resolve by exact match of
//! their date and minute-truncated time against the stored `fecha`/`hora`.
//!
//! `hora` has whole-second precision, so timestamps differing only below the
//! second collapse into one dimension row.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use retail_model::Table;
use retail_model::schema::{sales, shipments, time};
use tracing::debug;

use crate::datetime::{DATE_FORMAT, TIME_FORMAT, parse_coercive, truncate_to_minute};
use crate::error::Result;
use crate::frame::{int_values, string_values};

/// Builds the time dimension from raw timestamp cells.
///
/// Unparseable and missing values are skipped. Distinct timestamps are sorted
/// ascending and numbered from 1.
pub fn build_time_dimension(
    sale_dates: &[Option<String>],
    shipment_dates: &[Option<String>],
) -> Result<DataFrame> {
    let observed = sale_dates.len() + shipment_dates.len();
    let timestamps: BTreeSet<NaiveDateTime> = sale_dates
        .iter()
        .chain(shipment_dates)
        .filter_map(|value| value.as_deref().and_then(parse_coercive))
        .map(|ts| ts.with_nanosecond(0).unwrap_or(ts))
        .collect();

    let ids: Vec<i64> = (1..).take(timestamps.len()).collect();
    let dates: Vec<String> = timestamps.iter().map(|ts| ts.format(DATE_FORMAT).to_string()).collect();
    let times: Vec<String> = timestamps.iter().map(|ts| ts.format(TIME_FORMAT).to_string()).collect();
    let years: Vec<i32> = timestamps.iter().map(Datelike::year).collect();
    let months: Vec<u32> = timestamps.iter().map(Datelike::month).collect();
    let days: Vec<u32> = timestamps.iter().map(Datelike::day).collect();
    let day_names: Vec<String> = timestamps.iter().map(|ts| ts.format("%A").to_string()).collect();
    let month_names: Vec<String> = timestamps.iter().map(|ts| ts.format("%B").to_string()).collect();

    let df = DataFrame::new(vec![
        Series::new(time::ID.into(), ids).into_column(),
        Series::new(time::DATE.into(), dates).into_column(),
        Series::new(time::TIME.into(), times).into_column(),
        Series::new(time::YEAR.into(), years).into_column(),
        Series::new(time::MONTH.into(), months).into_column(),
        Series::new(time::DAY.into(), days).into_column(),
        Series::new(time::DAY_NAME.into(), day_names).into_column(),
        Series::new(time::MONTH_NAME.into(), month_names).into_column(),
    ])?;

    debug!(
        observed,
        distinct = df.height(),
        "built time dimension"
    );
    Ok(df)
}

/// Builds the time dimension straight from the raw sales and shipment extracts.
pub fn time_dimension_from_extracts(
    sales_raw: &DataFrame,
    shipments_raw: &DataFrame,
) -> Result<DataFrame> {
    let sale_dates = string_values(sales_raw, Table::Sales, sales::DATE)?;
    let shipment_dates = string_values(shipments_raw, Table::Shipments, shipments::SHIP_DATE)?;
    build_time_dimension(&sale_dates, &shipment_dates)
}

/// `(fecha, hora)` to `tiempo_id` lookup over a built time dimension.
#[derive(Debug, Clone, Default)]
pub struct TimeLookup {
    ids: BTreeMap<(NaiveDate, NaiveTime), i64>,
}

impl TimeLookup {
    pub fn from_dimension(dimension: &DataFrame) -> Result<Self> {
        let table = Table::Time;
        let ids = int_values(dimension, table, time::ID)?;
        let dates = string_values(dimension, table, time::DATE)?;
        let times = string_values(dimension, table, time::TIME)?;

        let ids = ids
            .into_iter()
            .zip(dates)
            .zip(times)
            .filter_map(|((id, date), time)| {
                let date = NaiveDate::parse_from_str(date.as_deref()?, DATE_FORMAT).ok()?;
                let time = NaiveTime::parse_from_str(time.as_deref()?, TIME_FORMAT).ok()?;
                Some(((date, time), id?))
            })
            .collect();
        Ok(Self { ids })
    }

    /// Resolves a fact timestamp, ignoring its seconds.
    pub fn resolve(&self, timestamp: NaiveDateTime) -> Option<i64> {
        let key = truncate_to_minute(timestamp);
        self.ids.get(&(key.date(), key.time())).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
