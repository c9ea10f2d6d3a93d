//! Free-text normalization for names, locations and categories.

/// Trims, collapses whitespace and capitalizes every token.
///
/// Each token gets an upper-case first character and a lower-case rest.
///
/// ```
/// use retail_transform::normalization::title_case;
///
/// assert_eq!(title_case("  ana   LÓPEZ "), "Ana López");
/// ```
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Applies [`title_case`] to a column, leaving missing values missing.
pub fn title_case_values(values: Vec<Option<String>>) -> Vec<Option<String>> {
    values
        .into_iter()
        .map(|value| value.map(|v| title_case(&v)))
        .collect()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
