//! Upload pipeline
//!
//! Drives one upload end to end: parse → validate count → encode → PUT.
//! The storage key is only handed back once the PUT has been acknowledged
//! with a 2xx status; a failed PUT leaves the state in `Error`.

use std::path::Path;

use tracing::{info, warn};

use crate::contact::ContactCollection;
use crate::error::{UploadError, UploadResult};
use crate::parse::{parse_contacts, ParseOptions};
use crate::state::UploadState;
use crate::transfer::{encode_collection, StorageClient, StorageTarget};

pub struct UploadPipeline {
    state: UploadState,
    options: ParseOptions,
    storage: StorageClient,
}

impl UploadPipeline {
    pub fn new(options: ParseOptions, storage: StorageClient) -> Self {
        Self {
            state: UploadState::default(),
            options,
            storage,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Parse a file and build its collection without transferring it
    ///
    /// Leaves the state in `Success` or `Error`.
    pub fn prepare(&mut self, file_name: Option<&str>, data: &[u8]) -> UploadResult<ContactCollection> {
        self.state.begin()?;

        let parsed = match parse_contacts(data, &self.options) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.state.fail(e.to_string());
                return Err(e);
            }
        };

        if parsed.contacts.is_empty() {
            let e = UploadError::NoContacts;
            self.state.fail(e.to_string());
            return Err(e);
        }

        self.state.succeed(&parsed);
        info!(
            file = file_name.unwrap_or("<unnamed>"),
            contacts = parsed.contacts.len(),
            custom_fields = parsed.custom_fields.len(),
            "Contact file parsed"
        );

        Ok(ContactCollection::new(
            file_name.map(str::to_string),
            parsed.custom_fields,
            parsed.contacts,
        ))
    }

    /// Run the whole upload; returns the storage key on success
    pub async fn upload(
        &mut self,
        file_name: Option<&str>,
        data: &[u8],
        target: &StorageTarget,
    ) -> UploadResult<String> {
        let collection = self.prepare(file_name, data)?;

        let result = match encode_collection(&collection) {
            Ok(payload) => self.storage.put(target, payload).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(target.object_key.clone()),
            Err(e) => {
                warn!("Contact upload failed: {}", e);
                self.state.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Read a file from disk and upload it under its file name
    pub async fn upload_file(&mut self, path: &Path, target: &StorageTarget) -> UploadResult<String> {
        let data = tokio::fs::read(path).await?;
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        self.upload(file_name.as_deref(), &data, target).await
    }
}
