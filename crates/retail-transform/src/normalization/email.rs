//! Supplier contact email validation.

use std::sync::LazyLock;

use regex::Regex;

/// Contact written when the raw value is not a usable address.
pub const PLACEHOLDER_EMAIL: &str = "contacto@desconocido.com";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$").expect("Invalid email regex")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Returns the address unchanged when valid, the placeholder otherwise.
pub fn normalize_email(raw: Option<&str>) -> String {
    match raw {
        Some(value) if is_valid_email(value) => value.to_string(),
        _ => PLACEHOLDER_EMAIL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_email("ventas@acme.com"));
        assert!(is_valid_email("j.perez+compras@mi-empresa.com.pe"));
    }

    #[test]
    fn test_invalid_addresses_use_placeholder() {
        assert_eq!(normalize_email(Some("sin-arroba.com")), PLACEHOLDER_EMAIL);
        assert_eq!(normalize_email(Some("a@b")), PLACEHOLDER_EMAIL);
        assert_eq!(normalize_email(Some("a b@c.com")), PLACEHOLDER_EMAIL);
        assert_eq!(normalize_email(None), PLACEHOLDER_EMAIL);
        assert_eq!(normalize_email(Some("ok@acme.io")), "ok@acme.io");
    }
}
