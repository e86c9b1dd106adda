use super::{BlobKey, BlobStore, StorageResult};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Blobs created from the file parts of one form submission, by field name.
#[derive(Debug, Clone, Default)]
pub struct UploadSet {
    uploads: HashMap<String, Vec<BlobKey>>,
}

impl UploadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, key: BlobKey) {
        self.uploads.entry(field.into()).or_default().push(key);
    }

    pub fn get(&self, field: &str) -> Option<&[BlobKey]> {
        self.uploads.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.values().all(Vec::is_empty)
    }

    /// Every stored key, across all fields.
    pub fn keys(&self) -> impl Iterator<Item = &BlobKey> {
        self.uploads.values().flatten()
    }
}

/// Delete every blob of a finished form submission.
///
/// Failures are logged and skipped; the response has already been decided.
pub async fn discard_uploads(store: &dyn BlobStore, uploads: &UploadSet) {
    for key in uploads.keys() {
        if let Err(e) = store.delete(key).await {
            warn!(key = %key, error = %e, "Failed to delete uploaded blob");
        }
    }
}

/// Find the blob uploaded through `field`, if the user actually sent a file.
///
/// The form carries at most one file per field, so only the first key is
/// considered. Submitting the form without picking a file still produces an
/// empty blob; that blob is deleted here and treated as no upload.
pub async fn extract_upload(
    store: &dyn BlobStore,
    uploads: &UploadSet,
    field: &str,
) -> StorageResult<Option<BlobKey>> {
    let key = match uploads.get(field).and_then(|keys| keys.first()) {
        Some(key) => key,
        None => {
            debug!(field, "No upload bound to form field");
            return Ok(None);
        }
    };

    let info = store.metadata(key).await?;
    if info.size == 0 {
        info!(key = %key, field, "Discarding empty upload");
        store.delete(key).await?;
        return Ok(None);
    }

    Ok(Some(key.clone()))
}
