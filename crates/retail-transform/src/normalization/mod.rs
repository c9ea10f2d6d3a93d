//! Field normalizers applied by the entity cleaners.
//!
//! Each normalizer maps one raw cell to its cleaned value. None of them can
//! fail: an unusable value is replaced with the field's default.

pub mod age;
pub mod email;
pub mod price;
pub mod text;

pub use age::{DEFAULT_AGE, normalize_age};
pub use email::{PLACEHOLDER_EMAIL, is_valid_email, normalize_email};
pub use price::normalize_price;
pub use text::{title_case, title_case_values};
