use std::sync::Arc;

use mv_core::blob::DEFAULT_CONTENT_TYPE;
use mv_core::ports::{AssetIndexPort, BlobStoreError, BlobStorePort};
use mv_core::{AssetRecord, AssetTitle, BlobMeta, BlobReadStream, ValidationError};
use tracing::{debug, warn};

use crate::error::AssetError;

/// Everything a transport needs to serve an asset's bytes.
pub struct DownloadedAsset {
    pub record: AssetRecord,
    pub blob: BlobMeta,
    /// Declared content type, or `application/octet-stream` when absent.
    pub content_type: String,
    /// Chunks in order, fetched as the consumer polls.
    pub stream: BlobReadStream,
}

/// Resolve title → blob and open a streaming read.
/// 通过标题解析 blob 并打开流式读取。
pub struct DownloadAsset {
    asset_index: Arc<dyn AssetIndexPort>,
    blob_store: Arc<dyn BlobStorePort>,
}

impl DownloadAsset {
    pub fn new(asset_index: Arc<dyn AssetIndexPort>, blob_store: Arc<dyn BlobStorePort>) -> Self {
        Self {
            asset_index,
            blob_store,
        }
    }

    #[tracing::instrument(name = "usecase.download_asset.execute", skip(self))]
    pub async fn execute(&self, title: &str) -> Result<DownloadedAsset, AssetError> {
        let title = AssetTitle::parse(title).ok_or(ValidationError::MissingField("title"))?;
        let record = self.asset_index.find_by_title(&title).await?;

        let blob = self
            .blob_store
            .find_metadata(&record.stored_filename)
            .await
            .map_err(|err| dangling(&record, err))?;
        let stream = self
            .blob_store
            .open_read(&record.stored_filename)
            .await
            .map_err(|err| dangling(&record, err))?;

        let content_type = if blob.content_type.trim().is_empty() {
            DEFAULT_CONTENT_TYPE.to_string()
        } else {
            blob.content_type.clone()
        };

        debug!(
            blob_id = %blob.blob_id,
            bytes = blob.length,
            chunks = blob.chunk_count(),
            "Opened model stream"
        );
        Ok(DownloadedAsset {
            record,
            blob,
            content_type,
            stream,
        })
    }
}

/// A record whose blob is gone is an index inconsistency; it is reported
/// as a miss rather than a server failure.
fn dangling(record: &AssetRecord, err: BlobStoreError) -> AssetError {
    if let BlobStoreError::NotFound(_) = err {
        warn!(
            title = %record.title,
            stored_filename = %record.stored_filename,
            "Asset record points at a missing blob"
        );
    }
    err.into()
}
