//! Contact CSV parsing
//!
//! The first row holds the headers. Each header passes through the header
//! transformer before anything else looks at it, so `first_name` and
//! `FirstName` columns both land in `firstName`.
//!
//! Rows are filtered in a fixed order, which defines the validation counts:
//! 1. empty `cell` → `missingCellCount`
//! 2. `cell` that does not format to E.164 → `invalidCellCount`
//! 3. formatted `cell` already seen (first row wins) → `dupeCount`
//!
//! Retained rows then get `zip` reduced to five digits (or null).

use std::collections::HashSet;

use tracing::debug;

use crate::contact::{ContactRecord, ValidationStats, REQUIRED_UPLOAD_FIELDS, TOP_LEVEL_UPLOAD_FIELDS};
use crate::error::{UploadError, UploadResult};
use crate::header::ensure_camel_case_required_headers;
use crate::phone::{format_phone_number, format_zip, DEFAULT_PHONE_COUNTRY};

/// UTF-8 BOM bytes
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parse options
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Country for national-format phone numbers
    pub phone_country: String,
    /// Applied to every header before validation
    pub header_transformer: fn(&str) -> String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            phone_country: DEFAULT_PHONE_COUNTRY.to_string(),
            header_transformer: ensure_camel_case_required_headers,
        }
    }
}

impl ParseOptions {
    pub fn with_country(country: impl Into<String>) -> Self {
        Self {
            phone_country: country.into(),
            ..Self::default()
        }
    }
}

/// Result of parsing a contact file
#[derive(Debug, Clone)]
pub struct ParsedContacts {
    pub contacts: Vec<ContactRecord>,
    /// Columns outside the top-level field set, in file order
    pub custom_fields: Vec<String>,
    pub validation_stats: ValidationStats,
}

/// Parse a contact CSV from raw bytes
pub fn parse_contacts(data: &[u8], options: &ParseOptions) -> UploadResult<ParsedContacts> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| UploadError::Parse(e.to_string()))?
        .iter()
        .map(options.header_transformer)
        .collect();

    let missing: Vec<&str> = REQUIRED_UPLOAD_FIELDS
        .iter()
        .copied()
        .filter(|field| !headers.iter().any(|h| h == field))
        .collect();
    if !missing.is_empty() {
        return Err(UploadError::Parse(format!("Missing fields: {}", missing.join(", "))));
    }

    let mut custom_fields: Vec<String> = Vec::new();
    for header in &headers {
        if !TOP_LEVEL_UPLOAD_FIELDS.contains(&header.as_str()) && !custom_fields.contains(header) {
            custom_fields.push(header.clone());
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| UploadError::Parse(e.to_string()))?;
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        let mut row = ContactRecord::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.set(header, Some(value.to_string()));
        }
        rows.push(row);
    }

    let (contacts, validation_stats) = validate_rows(rows, &options.phone_country);
    debug!(
        retained = contacts.len(),
        removed = validation_stats.removed_total(),
        "Parsed contact file"
    );

    Ok(ParsedContacts {
        contacts,
        custom_fields,
        validation_stats,
    })
}

fn validate_rows(rows: Vec<ContactRecord>, country: &str) -> (Vec<ContactRecord>, ValidationStats) {
    let mut stats = ValidationStats::default();

    let (with_cell, missing): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|row| row.cell().is_some_and(|c| !c.is_empty()));
    stats.missing_cell_count = missing.len();

    let mut formatted = Vec::with_capacity(with_cell.len());
    for mut row in with_cell {
        match row.cell().and_then(|c| format_phone_number(c, country)) {
            Some(cell) => {
                row.set("cell", Some(cell));
                formatted.push(row);
            }
            None => stats.invalid_cell_count += 1,
        }
    }

    let mut seen = HashSet::new();
    let mut contacts = Vec::with_capacity(formatted.len());
    for mut row in formatted {
        let cell = row.cell().unwrap_or_default().to_string();
        if !seen.insert(cell) {
            stats.dupe_count += 1;
            continue;
        }
        let zip = row.zip().and_then(format_zip);
        row.set("zip", zip);
        contacts.push(row);
    }
    stats.zip_count = contacts.iter().filter(|row| row.zip().is_some()).count();

    (contacts, stats)
}
