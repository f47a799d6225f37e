//! Storage transfer
//!
//! The contact collection travels as base64 text of a gzip stream of its
//! compact JSON, PUT to a pre-signed single-object URL. The storage
//! endpoint and its reference key are handed to the loader out-of-band as
//! client choice data: `{"s3Url": "...", "s3key": "..."}`.

use std::io::Write;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::contact::ContactCollection;
use crate::error::{UploadError, UploadResult};

/// Where the encoded collection goes, and the key that names it afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageTarget {
    /// Pre-signed, time-limited PUT URL
    #[serde(rename = "s3Url")]
    pub put_url: String,
    /// Reference token reported back to the caller after the PUT
    #[serde(rename = "s3key")]
    pub object_key: String,
}

impl StorageTarget {
    /// Parse client choice data JSON
    pub fn from_client_choice_data(data: &str) -> UploadResult<Self> {
        serde_json::from_str(data).map_err(|e| UploadError::InvalidClientChoiceData(e.to_string()))
    }
}

/// Serialize, gzip and base64-encode a collection
pub fn encode_collection(collection: &ContactCollection) -> UploadResult<String> {
    let json = serde_json::to_vec(collection).map_err(|e| UploadError::Encode(e.to_string()))?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| UploadError::Encode(e.to_string()))?;
    let gzipped = encoder.finish().map_err(|e| UploadError::Encode(e.to_string()))?;

    debug!(json_bytes = json.len(), gzip_bytes = gzipped.len(), "Encoded contact collection");
    Ok(STANDARD.encode(gzipped))
}

/// HTTP client for pre-signed storage PUTs
#[derive(Debug, Clone)]
pub struct StorageClient {
    http_client: reqwest::Client,
}

impl StorageClient {
    /// Create a client; `timeout` of `None` waits indefinitely
    pub fn new(timeout: Option<Duration>) -> UploadResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| UploadError::Transfer(e.to_string()))?;
        Ok(Self { http_client })
    }

    /// PUT the payload; any non-2xx status is a transfer failure
    pub async fn put(&self, target: &StorageTarget, payload: String) -> UploadResult<()> {
        let bytes = payload.len();
        let response = self
            .http_client
            .put(&target.put_url)
            .body(payload)
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Storage PUT rejected");
            return Err(UploadError::Transfer(format!(
                "storage responded {}: {}",
                status,
                body.trim()
            )));
        }

        info!(bytes, key = %target.object_key, "Contact collection stored");
        Ok(())
    }
}
