//! Error types for ptx-cu

use thiserror::Error;

/// Message shown when a file parses but yields no usable contacts
pub const NO_CONTACTS_MESSAGE: &str = "Upload at least one contact";

/// Upload error type
#[derive(Debug, Error)]
pub enum UploadError {
    /// Malformed CSV or missing required headers
    #[error("{0}")]
    Parse(String),

    /// File parsed but every row was dropped (or there were none)
    #[error("{}", NO_CONTACTS_MESSAGE)]
    NoContacts,

    /// Storage PUT failed (transport error or non-2xx status)
    #[error("Upload transfer failed: {0}")]
    Transfer(String),

    /// Client choice data is not the expected `{s3Url, s3key}` JSON
    #[error("Invalid client choice data: {0}")]
    InvalidClientChoiceData(String),

    /// `begin` called while an upload is already in flight
    #[error("An upload is already in progress")]
    AlreadyUploading,

    /// Serializing or compressing the contact collection failed
    #[error("Failed to encode contacts: {0}")]
    Encode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ptx-common error
    #[error("Common error: {0}")]
    Common(#[from] ptx_common::Error),
}

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;
