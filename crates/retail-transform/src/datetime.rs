//! Timestamp parsing for sale and shipment dates.
//!
//! Sales carry a fixed `YYYY-MM-DD HH:MM:SS` timestamp and are parsed
//! strictly. Shipment dates and the time dimension accept the common layouts
//! an operator might export, down to a bare date.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Canonical timestamp layout, also used to re-serialize parsed values.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parses exactly `YYYY-MM-DD HH:MM:SS`.
pub fn parse_strict(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), CANONICAL_FORMAT).ok()
}

/// Parses any supported datetime or date layout. Dates resolve to midnight.
pub fn parse_coercive(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    try_parse_datetime(trimmed).or_else(|| try_parse_date(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S", // US, as exported by spreadsheets
        "%m/%d/%Y %H:%M",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
