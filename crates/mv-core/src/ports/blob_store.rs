use async_trait::async_trait;
use std::sync::Arc;

use crate::blob::{BlobMeta, BlobReadStream, ByteStream};
use crate::ids::BlobId;

use super::errors::BlobStoreError;

/// Chunked blob storage.
/// 分块 blob 存储。
///
/// A blob becomes visible to `find_metadata`/`open_read` only after every
/// chunk and the trailing metadata record are committed.
#[async_trait]
pub trait BlobStorePort: Send + Sync {
    /// Consume `source` incrementally, persist it as fixed-size chunks and
    /// commit the metadata record last.
    async fn write(
        &self,
        source: ByteStream,
        filename: &str,
        content_type: &str,
    ) -> Result<BlobMeta, BlobStoreError>;

    async fn find_metadata(&self, filename: &str) -> Result<BlobMeta, BlobStoreError>;

    /// Lazy, ordered, forward-only stream of the blob's bytes. Chunks are
    /// fetched as the consumer polls; dropping the stream stops further reads.
    async fn open_read(&self, filename: &str) -> Result<BlobReadStream, BlobStoreError>;

    /// Remove a committed blob and its chunks. Used for compensation only.
    async fn delete(&self, blob_id: &BlobId) -> Result<(), BlobStoreError>;
}

#[async_trait]
impl<T: BlobStorePort + ?Sized> BlobStorePort for Arc<T> {
    async fn write(
        &self,
        source: ByteStream,
        filename: &str,
        content_type: &str,
    ) -> Result<BlobMeta, BlobStoreError> {
        (**self).write(source, filename, content_type).await
    }

    async fn find_metadata(&self, filename: &str) -> Result<BlobMeta, BlobStoreError> {
        (**self).find_metadata(filename).await
    }

    async fn open_read(&self, filename: &str) -> Result<BlobReadStream, BlobStoreError> {
        (**self).open_read(filename).await
    }

    async fn delete(&self, blob_id: &BlobId) -> Result<(), BlobStoreError> {
        (**self).delete(blob_id).await
    }
}
