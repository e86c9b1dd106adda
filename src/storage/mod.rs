//! Blob storage layer
//!
//! Uploaded photos live in an external blob store and are referenced by
//! [`BlobKey`]. The store is reached only through the [`BlobStore`] trait so
//! the request pipeline never touches a concrete backend:
//! - [`InMemoryBlobStore`] - process-local store for development and tests
//! - [`S3BlobStore`] - any S3-compatible bucket via `rust-s3`

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod memory;
pub mod reader;
pub mod s3_client;
pub mod uploads;

pub use memory::InMemoryBlobStore;
pub use reader::read_all;
pub use s3_client::S3BlobStore;
pub use uploads::{discard_uploads, extract_upload, UploadSet};

/// Opaque identifier of a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobKey(String);

impl BlobKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// A fresh random key for a new upload.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata the store keeps for a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobInfo {
    pub size: u64,
    pub content_type: String,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Blob not found: {0}")]
    NotFound(BlobKey),

    #[error("Blob fetch page size must be greater than zero")]
    InvalidPageSize,

    #[error("Blob store request failed: {0}")]
    Backend(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under a newly generated key.
    async fn put(&self, data: Bytes, content_type: &str) -> StorageResult<BlobKey>;

    async fn metadata(&self, key: &BlobKey) -> StorageResult<BlobInfo>;

    /// Read the inclusive byte range `[start, end]`.
    ///
    /// A range running past the end of the blob yields the bytes that exist,
    /// possibly none.
    async fn fetch_range(&self, key: &BlobKey, start: u64, end: u64) -> StorageResult<Bytes>;

    async fn delete(&self, key: &BlobKey) -> StorageResult<()>;

    /// Short backend name, reported by the health endpoint.
    fn name(&self) -> &'static str;
}
