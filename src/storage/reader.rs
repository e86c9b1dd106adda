use super::{BlobKey, BlobStore, StorageError, StorageResult};
use tracing::debug;

/// Read a whole blob by fetching consecutive pages of `page_size` bytes.
///
/// A page shorter than `page_size` (including an empty one) marks the end of
/// the blob. Transport errors are returned as-is, nothing is retried.
pub async fn read_all(
    store: &dyn BlobStore,
    key: &BlobKey,
    page_size: u64,
) -> StorageResult<Vec<u8>> {
    if page_size == 0 {
        return Err(StorageError::InvalidPageSize);
    }

    let mut output = Vec::new();
    let mut cursor: u64 = 0;
    let mut pages = 0usize;

    loop {
        // End index is inclusive.
        let page = store
            .fetch_range(key, cursor, cursor + page_size - 1)
            .await?;
        pages += 1;
        output.extend_from_slice(&page);

        if (page.len() as u64) < page_size {
            break;
        }
        cursor += page_size;
    }

    debug!(key = %key, pages, size = output.len(), "Read blob");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BlobInfo, InMemoryBlobStore};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Wraps the in-memory store and records every range request.
    struct CountingStore {
        inner: InMemoryBlobStore,
        fetches: Mutex<Vec<(u64, u64)>>,
        fail_on_fetch: Option<usize>,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryBlobStore::new(),
                fetches: Mutex::new(Vec::new()),
                fail_on_fetch: None,
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BlobStore for CountingStore {
        async fn put(&self, data: Bytes, content_type: &str) -> StorageResult<BlobKey> {
            self.inner.put(data, content_type).await
        }

        async fn metadata(&self, key: &BlobKey) -> StorageResult<BlobInfo> {
            self.inner.metadata(key).await
        }

        async fn fetch_range(&self, key: &BlobKey, start: u64, end: u64) -> StorageResult<Bytes> {
            let call = {
                let mut fetches = self.fetches.lock().unwrap();
                fetches.push((start, end));
                fetches.len()
            };
            if self.fail_on_fetch == Some(call) {
                return Err(StorageError::Backend("connection reset".to_string()));
            }
            self.inner.fetch_range(key, start, end).await
        }

        async fn delete(&self, key: &BlobKey) -> StorageResult<()> {
            self.inner.delete(key).await
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn test_partial_last_page() {
        const PAGE: u64 = 16;
        for (k, r) in [(0usize, 5usize), (1, 1), (3, 15), (0, 0)] {
            let store = CountingStore::new();
            let content = sample(k * PAGE as usize + r);
            let key = store
                .put(Bytes::from(content.clone()), "image/png")
                .await
                .unwrap();

            let bytes = read_all(&store, &key, PAGE).await.unwrap();

            assert_eq!(bytes, content);
            assert_eq!(store.fetch_count(), k + 1, "k={} r={}", k, r);
        }
    }

    #[tokio::test]
    async fn test_exact_multiple_ends_with_empty_read() {
        let store = CountingStore::new();
        let content = sample(64);
        let key = store
            .put(Bytes::from(content.clone()), "image/png")
            .await
            .unwrap();

        let bytes = read_all(&store, &key, 16).await.unwrap();

        assert_eq!(bytes, content);
        let fetches = store.fetches.lock().unwrap().clone();
        assert_eq!(fetches.len(), 5);
        assert_eq!(fetches[0], (0, 15));
        assert_eq!(fetches[4], (64, 79));
    }

    #[tokio::test]
    async fn test_transport_error_aborts() {
        let mut store = CountingStore::new();
        store.fail_on_fetch = Some(2);
        let key = store
            .put(Bytes::from(sample(40)), "image/png")
            .await
            .unwrap();

        let result = read_all(&store, &key, 16).await;

        assert!(matches!(result, Err(StorageError::Backend(_))));
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let store = InMemoryBlobStore::new();
        let key = store.put(Bytes::from_static(b"x"), "image/png").await.unwrap();
        assert!(matches!(
            read_all(&store, &key, 0).await,
            Err(StorageError::InvalidPageSize)
        ));
    }
}
