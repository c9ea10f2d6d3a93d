//! Polars AnyValue and raw cell coercions.
//!
//! Raw extracts are read as strings, so most stages work from `&str` cells.
//! The `any_to_*` helpers cover cleaned tables, whose columns carry real
//! numeric types.

use polars::prelude::AnyValue;

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, formats floats without trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use retail_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int64(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("hola")), "hola");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use retail_common::format_numeric;
///
/// assert_eq!(format_numeric(150.0), "150");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an `AnyValue` to an exact `i64`.
///
/// Floats and strings only convert when they carry no fractional part.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => exact_int(f64::from(v)),
        AnyValue::Float64(v) => exact_int(v),
        AnyValue::String(s) => parse_exact_int(s),
        AnyValue::StringOwned(s) => parse_exact_int(&s),
        _ => None,
    }
}

/// Parses a string as a finite `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a string that must round-trip through a float to an exact integer.
///
/// `"3"` and `"3.0"` both yield `3`; `"3.5"`, `"x"` and `""` yield `None`.
pub fn parse_exact_int(value: &str) -> Option<i64> {
    parse_f64(value).and_then(exact_int)
}

/// Parses a numeric string and truncates it toward zero.
///
/// `"3.7"` yields `3`; non-numeric input yields `None`.
pub fn parse_truncated_int(value: &str) -> Option<i64> {
    let v = parse_f64(value)?;
    in_i64_range(v.trunc()).then(|| v.trunc() as i64)
}

/// Rounds a monetary amount to two decimals, breaking ties to the even cent.
///
/// ```
/// use retail_common::round_to_cents;
///
/// assert_eq!(round_to_cents(0.125), 0.12);
/// assert_eq!(round_to_cents(0.375), 0.38);
/// ```
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn exact_int(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && in_i64_range(v) {
        Some(v as i64)
    } else {
        None
    }
}

fn in_i64_range(v: f64) -> bool {
    v >= i64::MIN as f64 && v < i64::MAX as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_numbers() {
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
        assert_eq!(any_to_string(AnyValue::Float64(12.5)), "12.5");
    }

    #[test]
    fn test_format_numeric_keeps_integer_zeros() {
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(1000.0), "1000");
        assert_eq!(format_numeric(100.5), "100.5");
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Null), None);
        assert_eq!(any_to_f64(AnyValue::Int32(42)), Some(42.0));
        assert_eq!(any_to_f64(AnyValue::String("2.5")), Some(2.5));
        assert_eq!(any_to_f64(AnyValue::String("invalid")), None);
    }

    #[test]
    fn test_any_to_i64_is_exact() {
        assert_eq!(any_to_i64(AnyValue::Float64(3.0)), Some(3));
        assert_eq!(any_to_i64(AnyValue::Float64(3.9)), None);
        assert_eq!(any_to_i64(AnyValue::String("100")), Some(100));
        assert_eq!(any_to_i64(AnyValue::String("invalid")), None);
    }

    #[test]
    fn test_parse_f64_rejects_non_finite() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  3.25 "), Some(3.25));
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("NaN"), None);
    }

    #[test]
    fn test_parse_exact_int() {
        assert_eq!(parse_exact_int("3"), Some(3));
        assert_eq!(parse_exact_int("3.0"), Some(3));
        assert_eq!(parse_exact_int("3.5"), None);
        assert_eq!(parse_exact_int("x"), None);
        assert_eq!(parse_exact_int(""), None);
    }

    #[test]
    fn test_parse_truncated_int() {
        assert_eq!(parse_truncated_int("3.7"), Some(3));
        assert_eq!(parse_truncated_int("-2.2"), Some(-2));
        assert_eq!(parse_truncated_int("abc"), None);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(10.456), 10.46);
        assert_eq!(round_to_cents(3.0 * 19.99), 59.97);
        assert_eq!(round_to_cents(0.0), 0.0);
    }

    #[test]
    fn test_round_to_cents_ties_to_even() {
        assert_eq!(round_to_cents(0.125), 0.12);
        assert_eq!(round_to_cents(0.625), 0.62);
        assert_eq!(round_to_cents(0.375), 0.38);
        assert_eq!(round_to_cents(-0.125), -0.12);
    }
}
