//! Phone number and postal code formatting
//!
//! Numbers are validated against libphonenumber metadata and stored in
//! E.164 form (`+12025550123`). National-format input is read in the
//! configured country; input with a leading `+` carries its own calling code.

use once_cell::sync::Lazy;
use phonenumber::{country, Mode};
use regex::Regex;

/// Country used when none is configured
pub const DEFAULT_PHONE_COUNTRY: &str = "US";

static ZIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{5})([ \-]\d{4})?").expect("zip pattern is valid")
});

/// Format a phone number to E.164, or `None` if it is not a valid number
///
/// An unknown country code leaves only `+`-prefixed input parseable.
pub fn format_phone_number(raw: &str, region_code: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let region = region_code.trim().to_ascii_uppercase().parse::<country::Id>().ok();
    let number = phonenumber::parse(region, trimmed).ok()?;
    if !phonenumber::is_valid(&number) {
        return None;
    }

    Some(number.format().mode(Mode::E164).to_string())
}

/// Reduce a ZIP or ZIP+4 to its five-digit form
pub fn format_zip(raw: &str) -> Option<String> {
    ZIP_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_national_formats() {
        assert_eq!(format_phone_number("2025550123", "US").as_deref(), Some("+12025550123"));
        assert_eq!(format_phone_number("(202) 555-0123", "US").as_deref(), Some("+12025550123"));
        assert_eq!(format_phone_number("202.555.0123", "us").as_deref(), Some("+12025550123"));
        assert_eq!(format_phone_number("1-202-555-0123", "US").as_deref(), Some("+12025550123"));
        assert_eq!(format_phone_number("+1 202 555 0123", "US").as_deref(), Some("+12025550123"));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert_eq!(format_phone_number("123", "US"), None);
        assert_eq!(format_phone_number("2021550123", "US"), None); // exchange starts with 1
        assert_eq!(format_phone_number("9115550123", "US"), None); // N11 area code
        assert_eq!(format_phone_number("22025550123", "US"), None);
        assert_eq!(format_phone_number("   ", "US"), None);
    }

    #[test]
    fn test_international_numbers() {
        assert_eq!(format_phone_number("+44 20 7946 0958", "US").as_deref(), Some("+442079460958"));
        assert_eq!(format_phone_number("+0 20 7946 0958", "US"), None);
        // Unassigned calling code
        assert_eq!(format_phone_number("+999 1234 5678", "US"), None);
    }

    #[test]
    fn test_national_format_follows_country() {
        assert_eq!(format_phone_number("020 7946 0958", "GB").as_deref(), Some("+442079460958"));
        assert_eq!(format_phone_number("020 7946 0958", "US"), None);
        // Unknown country: only international input parses
        assert_eq!(format_phone_number("2025550123", "XX"), None);
        assert_eq!(format_phone_number("+1 202 555 0123", "XX").as_deref(), Some("+12025550123"));
    }

    #[test]
    fn test_zip_formatting() {
        assert_eq!(format_zip("98101").as_deref(), Some("98101"));
        assert_eq!(format_zip("98101-1234").as_deref(), Some("98101"));
        assert_eq!(format_zip("98101 1234").as_deref(), Some("98101"));
        assert_eq!(format_zip("zip: 02139").as_deref(), Some("02139"));
        assert_eq!(format_zip("981"), None);
        assert_eq!(format_zip(""), None);
    }
}
