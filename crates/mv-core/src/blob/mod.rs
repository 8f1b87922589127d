//! Chunked blob model.
//! 分块 blob 模型。

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::ids::BlobId;
use crate::ports::errors::BlobStoreError;

mod chunker;

pub use chunker::Chunker;

/// 255 KiB, the conventional chunk size of chunked object stores.
pub const DEFAULT_CHUNK_SIZE: usize = 255 * 1024;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Input to a blob write. The store consumes it incrementally.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Output of a blob read: chunk-sized slices in sequence order.
pub type BlobReadStream = BoxStream<'static, Result<Bytes, BlobStoreError>>;

/// Committed blob metadata. Its presence is what makes a blob visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobMeta {
    pub blob_id: BlobId,
    pub filename: String,
    pub length: u64,
    pub chunk_size: u32,
    pub content_type: String,
    pub upload_date: DateTime<Utc>,
}

impl BlobMeta {
    /// Number of chunks covering `length` bytes: `ceil(length / chunk_size)`.
    pub fn chunk_count(&self) -> u64 {
        chunk_count(self.length, self.chunk_size as u64)
    }

    /// Expected byte length of chunk `seq`.
    pub fn expected_chunk_len(&self, seq: u64) -> u64 {
        let chunk_size = self.chunk_size as u64;
        let start = seq.saturating_mul(chunk_size);
        self.length.saturating_sub(start).min(chunk_size)
    }
}

pub fn chunk_count(length: u64, chunk_size: u64) -> u64 {
    if chunk_size == 0 {
        return 0;
    }
    length.div_ceil(chunk_size)
}
