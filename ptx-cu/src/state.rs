//! Upload state machine
//!
//! ```text
//! Idle ──begin──▶ Uploading ──succeed──▶ Success
//!                     │                     │
//!                     └──fail──▶ Error ◀────┘ (transfer failure)
//! ```
//!
//! `Success` and `Error` are terminal for one upload; `begin` starts the
//! next one. Only one upload may be in flight.

use tracing::debug;

use crate::contact::ValidationStats;
use crate::error::{UploadError, UploadResult};
use crate::parse::ParsedContacts;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Success {
        validation_stats: ValidationStats,
        custom_fields: Vec<String>,
        contacts_count: usize,
    },
    Error {
        message: String,
    },
}

impl UploadState {
    /// Start an upload
    pub fn begin(&mut self) -> UploadResult<()> {
        if self.is_uploading() {
            return Err(UploadError::AlreadyUploading);
        }
        debug!("Upload state: {} -> uploading", self.name());
        *self = UploadState::Uploading;
        Ok(())
    }

    /// Record a successful parse
    pub fn succeed(&mut self, parsed: &ParsedContacts) {
        debug!(contacts = parsed.contacts.len(), "Upload state: {} -> success", self.name());
        *self = UploadState::Success {
            validation_stats: parsed.validation_stats,
            custom_fields: parsed.custom_fields.clone(),
            contacts_count: parsed.contacts.len(),
        };
    }

    /// Record a failure; any stats from an earlier success are discarded
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("Upload state: {} -> error ({})", self.name(), message);
        *self = UploadState::Error { message };
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Uploading => "uploading",
            UploadState::Success { .. } => "success",
            UploadState::Error { .. } => "error",
        }
    }

    pub fn validation_stats(&self) -> Option<&ValidationStats> {
        match self {
            UploadState::Success { validation_stats, .. } => Some(validation_stats),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UploadState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Button label for the upload control
    pub fn button_label(&self) -> &'static str {
        if self.is_uploading() {
            "Uploading..."
        } else {
            "Upload contacts"
        }
    }

    /// "Uploaded" summary: contact count, custom field count, then each field
    ///
    /// Empty unless the last upload succeeded with at least one contact.
    pub fn contact_summary(&self) -> Vec<String> {
        match self {
            UploadState::Success {
                custom_fields,
                contacts_count,
                ..
            } if *contacts_count > 0 => {
                let mut lines = vec![
                    format!("{} contacts", contacts_count),
                    format!("{} custom fields", custom_fields.len()),
                ];
                lines.extend(custom_fields.iter().cloned());
                lines
            }
            _ => Vec::new(),
        }
    }

    /// Removal warnings for the last successful parse
    pub fn validation_messages(&self) -> Vec<String> {
        self.validation_stats()
            .map(ValidationStats::removal_messages)
            .unwrap_or_default()
    }
}
