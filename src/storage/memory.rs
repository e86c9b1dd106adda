use super::{BlobInfo, BlobKey, BlobStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

struct StoredBlob {
    data: Bytes,
    content_type: String,
}

/// Blob store kept entirely in process memory.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<BlobKey, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    pub async fn contains(&self, key: &BlobKey) -> bool {
        self.blobs.read().await.contains_key(key)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, data: Bytes, content_type: &str) -> StorageResult<BlobKey> {
        let key = BlobKey::generate();
        debug!(key = %key, size = data.len(), "Storing blob in memory");
        self.blobs.write().await.insert(
            key.clone(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(key)
    }

    async fn metadata(&self, key: &BlobKey) -> StorageResult<BlobInfo> {
        let blobs = self.blobs.read().await;
        let blob = blobs
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.clone()))?;
        Ok(BlobInfo {
            size: blob.data.len() as u64,
            content_type: blob.content_type.clone(),
        })
    }

    async fn fetch_range(&self, key: &BlobKey, start: u64, end: u64) -> StorageResult<Bytes> {
        let blobs = self.blobs.read().await;
        let blob = blobs
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.clone()))?;

        let len = blob.data.len() as u64;
        if start >= len || end < start {
            return Ok(Bytes::new());
        }
        let end_exclusive = end.saturating_add(1).min(len);
        Ok(blob.data.slice(start as usize..end_exclusive as usize))
    }

    async fn delete(&self, key: &BlobKey) -> StorageResult<()> {
        self.blobs.write().await.remove(key);
        debug!(key = %key, "Deleted blob from memory");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
