//! CSV header normalization
//!
//! Required upload fields may be written in snake_case (`first_name`) or
//! with a leading capital (`FirstName`); both are folded to the canonical
//! camelCase name. Every other header is left exactly as written, since
//! custom field names are referenced verbatim from texting scripts.

use crate::contact::REQUIRED_UPLOAD_FIELDS;

/// Fold a string to camelCase
///
/// Runs of `-`, `_` and whitespace are removed and the character following
/// each run is upper-cased; the first character is lower-cased. Numeric and
/// blank strings are returned unchanged.
pub fn camelize(input: &str) -> String {
    if is_numeric(input) {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if is_separator(c) {
            while chars.peek().copied().is_some_and(is_separator) {
                chars.next();
            }
            if let Some(next) = chars.next() {
                out.extend(next.to_uppercase());
            }
        } else {
            out.push(c);
        }
    }

    let mut folded = out.chars();
    match folded.next() {
        Some(first) => first.to_lowercase().chain(folded).collect(),
        None => out,
    }
}

/// Map a header to its canonical required-field name, if it is one
///
/// - `first_name` → `firstName`
/// - `LastName` → `lastName`
/// - `favorite_color` → `favorite_color` (not a required field)
pub fn ensure_camel_case_required_headers(column_header: &str) -> String {
    let camelized = camelize(column_header);
    if REQUIRED_UPLOAD_FIELDS.contains(&camelized.as_str()) && camelized != column_header {
        return camelized;
    }
    column_header.to_string()
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c.is_whitespace()
}

fn is_numeric(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.is_empty() || trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}
