//! Product base price normalization.

use retail_common::{parse_f64, round_to_cents};

/// Parses a price and rounds it to cents. Unusable values become `0.0`.
pub fn normalize_price(raw: Option<&str>) -> f64 {
    raw.and_then(parse_f64).map_or(0.0, round_to_cents)
}
