//! Contact upload data model

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Fields every upload must carry (after header normalization)
pub const REQUIRED_UPLOAD_FIELDS: [&str; 3] = ["firstName", "lastName", "cell"];

/// Fields with a fixed meaning; every other column is a custom field
pub const TOP_LEVEL_UPLOAD_FIELDS: [&str; 5] = ["firstName", "lastName", "cell", "zip", "external_id"];

/// One row of an uploaded file
///
/// Columns keep file order. A `None` value serializes as JSON `null`
/// (used for `zip` when the row has no usable postal code).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    fields: Vec<(String, Option<String>)>,
}

impl ContactRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a column value; `None` when the column is absent or null
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Set a column, replacing the value in place if it already exists
    pub fn set(&mut self, column: &str, value: Option<String>) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    pub fn cell(&self) -> Option<&str> {
        self.get("cell")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.get("firstName")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.get("lastName")
    }

    pub fn zip(&self) -> Option<&str> {
        self.get("zip")
    }

    pub fn external_id(&self) -> Option<&str> {
        self.get("external_id")
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ContactRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Rows dropped while parsing, by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub dupe_count: usize,
    pub missing_cell_count: usize,
    pub invalid_cell_count: usize,
    /// Retained rows with a usable zip (not a removal count)
    pub zip_count: usize,
}

impl ValidationStats {
    /// Human-readable removal lines; zero counts are omitted
    pub fn removal_messages(&self) -> Vec<String> {
        [
            (self.dupe_count, "duplicates"),
            (self.missing_cell_count, "rows with missing numbers"),
            (self.invalid_cell_count, "rows with invalid numbers"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, text)| format!("{} {} removed", count, text))
        .collect()
    }

    pub fn removed_total(&self) -> usize {
        self.dupe_count + self.missing_cell_count + self.invalid_cell_count
    }
}

/// The unit that is serialized, compressed and transferred to storage
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCollection {
    pub name: Option<String>,
    pub contacts_count: usize,
    pub custom_fields: Vec<String>,
    pub contacts: Vec<ContactRecord>,
}

impl ContactCollection {
    pub fn new(name: Option<String>, custom_fields: Vec<String>, contacts: Vec<ContactRecord>) -> Self {
        Self {
            name,
            contacts_count: contacts.len(),
            custom_fields,
            contacts,
        }
    }
}
