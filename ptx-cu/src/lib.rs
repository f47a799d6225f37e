//! ptx-cu library - Contact Upload loader
//!
//! Parses a contact CSV, normalizes its headers, validates phone numbers,
//! compresses the result and PUTs it to a pre-signed storage URL.
//!
//! The flow is driven by [`pipeline::UploadPipeline`], which owns the
//! [`state::UploadState`] machine (`Idle → Uploading → {Success, Error}`).

pub mod contact;
pub mod error;
pub mod header;
pub mod last_result;
pub mod parse;
pub mod phone;
pub mod pipeline;
pub mod state;
pub mod transfer;

pub use contact::{ContactCollection, ContactRecord, ValidationStats};
pub use error::{UploadError, UploadResult};
pub use header::ensure_camel_case_required_headers;
pub use parse::{parse_contacts, ParseOptions, ParsedContacts};
pub use pipeline::UploadPipeline;
pub use state::UploadState;
pub use transfer::{StorageClient, StorageTarget};
