//! Customer age normalization.

use retail_common::{format_numeric, parse_f64};

/// Age assigned when the raw value is unusable or out of range.
pub const DEFAULT_AGE: i64 = 18;
const MIN_AGE: f64 = 18.0;
const MAX_AGE: f64 = 100.0;

/// Normalizes a raw age cell.
///
/// Numbers above 100 are read as a typo with stray trailing digits and are
/// repaired to their first two characters; the repaired value is kept. Any
/// other value must fall in `[18, 100]`, otherwise [`DEFAULT_AGE`] is used.
/// Fractional ages truncate.
///
/// The repaired value is not range-checked again, so a cleaned `edad` can be
/// below 18 (`"150"` becomes 15). Consumers must not assume `[18, 100]`.
///
/// # Examples
///
/// ```
/// use retail_transform::normalization::normalize_age;
///
/// assert_eq!(normalize_age(Some("150")), 15);
/// assert_eq!(normalize_age(Some("45")), 45);
/// assert_eq!(normalize_age(Some("7")), 18);
/// ```
pub fn normalize_age(raw: Option<&str>) -> i64 {
    match raw.and_then(parse_f64) {
        Some(v) if v > MAX_AGE => repair_extra_digits(v).unwrap_or(DEFAULT_AGE),
        Some(v) if (MIN_AGE..=MAX_AGE).contains(&v) => v.trunc() as i64,
        _ => DEFAULT_AGE,
    }
}

fn repair_extra_digits(v: f64) -> Option<i64> {
    let digits: String = format_numeric(v).chars().take(2).collect();
    parse_f64(&digits)
        .filter(|age| *age > 0.0)
        .map(|age| age.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_is_kept() {
        assert_eq!(normalize_age(Some("45")), 45);
        assert_eq!(normalize_age(Some("18")), 18);
        assert_eq!(normalize_age(Some("100")), 100);
        assert_eq!(normalize_age(Some("45.9")), 45);
    }

    #[test]
    fn test_over_hundred_keeps_two_digits() {
        assert_eq!(normalize_age(Some("150")), 15);
        assert_eq!(normalize_age(Some("350")), 35);
        assert_eq!(normalize_age(Some("1000")), 10);
        assert_eq!(normalize_age(Some("100.5")), 10);
    }

    #[test]
    fn test_repaired_age_may_fall_below_minimum() {
        let repaired = normalize_age(Some("150"));
        assert!(repaired < MIN_AGE as i64);
        assert_eq!(normalize_age(Some("1000")), 10);
    }

    #[test]
    fn test_invalid_defaults() {
        assert_eq!(normalize_age(Some("7")), DEFAULT_AGE);
        assert_eq!(normalize_age(Some("abc")), DEFAULT_AGE);
        assert_eq!(normalize_age(Some("-30")), DEFAULT_AGE);
        assert_eq!(normalize_age(None), DEFAULT_AGE);
    }
}
