//! S3-compatible blob store
//!
//! Range reads map onto `GET` with a `Range` header. S3 answers a range that
//! starts at or past the end of the object with `416`, which is read as an
//! empty final page.

use super::{BlobInfo, BlobKey, BlobStore, StorageError, StorageResult};
use crate::config::StorageConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tracing::{info, warn};

const RANGE_NOT_SATISFIABLE: u16 = 416;
const NOT_FOUND: u16 = 404;

pub struct S3BlobStore {
    bucket: Bucket,
}

impl S3BlobStore {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        if config.s3_bucket.is_empty() {
            return Err(anyhow!("S3_BUCKET must be set when STORAGE_PROVIDER=s3"));
        }

        let region = match &config.s3_endpoint {
            Some(endpoint) => Region::Custom {
                region: config.s3_region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .s3_region
                .parse()
                .map_err(|e| anyhow!("Invalid S3 region {}: {}", config.s3_region, e))?,
        };

        let credentials = Credentials::new(
            config.s3_access_key_id.as_deref(),
            config.s3_secret_access_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| anyhow!("Invalid S3 credentials: {}", e))?;

        let mut bucket = Bucket::new(&config.s3_bucket, region, credentials)
            .map_err(|e| anyhow!("Failed to open bucket {}: {}", config.s3_bucket, e))?;
        if config.s3_endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        info!(bucket = %config.s3_bucket, "Using S3 blob store");
        Ok(Self { bucket })
    }

    fn path(key: &BlobKey) -> String {
        format!("/{}", key)
    }
}

fn map_error(key: &BlobKey, error: S3Error) -> StorageError {
    match error {
        S3Error::HttpFailWithBody(NOT_FOUND, _) => StorageError::NotFound(key.clone()),
        other => {
            warn!(key = %key, error = %other, "S3 request failed");
            StorageError::Backend(other.to_string())
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, data: Bytes, content_type: &str) -> StorageResult<BlobKey> {
        let key = BlobKey::generate();
        self.bucket
            .put_object_with_content_type(Self::path(&key), &data, content_type)
            .await
            .map_err(|e| map_error(&key, e))?;

        info!(key = %key, size = data.len(), "Uploaded blob to S3");
        Ok(key)
    }

    async fn metadata(&self, key: &BlobKey) -> StorageResult<BlobInfo> {
        let (head, _status) = self
            .bucket
            .head_object(Self::path(key))
            .await
            .map_err(|e| map_error(key, e))?;

        Ok(BlobInfo {
            size: head.content_length.unwrap_or(0).max(0) as u64,
            content_type: head
                .content_type
                .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string()),
        })
    }

    async fn fetch_range(&self, key: &BlobKey, start: u64, end: u64) -> StorageResult<Bytes> {
        match self
            .bucket
            .get_object_range(Self::path(key), start, Some(end))
            .await
        {
            Ok(response) => Ok(Bytes::copy_from_slice(response.as_slice())),
            Err(S3Error::HttpFailWithBody(RANGE_NOT_SATISFIABLE, _)) => Ok(Bytes::new()),
            Err(e) => Err(map_error(key, e)),
        }
    }

    async fn delete(&self, key: &BlobKey) -> StorageResult<()> {
        self.bucket
            .delete_object(Self::path(key))
            .await
            .map_err(|e| map_error(key, e))?;

        info!(key = %key, "Deleted blob from S3");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_missing_bucket_is_rejected() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert!(S3BlobStore::new(&config.storage).is_err());
    }

    #[test]
    fn test_custom_endpoint_builds_bucket() {
        let config = Config::from_lookup(|key| match key {
            "S3_BUCKET" => Some("photos".to_string()),
            "S3_ENDPOINT" => Some("http://localhost:9000".to_string()),
            "AWS_ACCESS_KEY_ID" => Some("minio".to_string()),
            "AWS_SECRET_ACCESS_KEY" => Some("minio-secret".to_string()),
            _ => None,
        })
        .unwrap();

        let store = S3BlobStore::new(&config.storage).unwrap();
        assert_eq!(store.name(), "s3");
    }

    #[test]
    fn test_object_path() {
        assert_eq!(S3BlobStore::path(&BlobKey::new("abc")), "/abc");
    }
}
