use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use mv_core::asset::{stored_filename, UploadStage};
use mv_core::blob::DEFAULT_CONTENT_TYPE;
use mv_core::ports::{AssetIndexError, AssetIndexPort, BlobStorePort, ClockPort};
use mv_core::{
    AssetRecord, AssetTitle, BlobMeta, ByteStream, NewAssetRecord, UploadPolicy, ValidationError,
};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::error::AssetError;

/// A file part as received from the transport.
/// 传输层收到的文件部分。
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub title: Option<String>,
    pub file: Option<IncomingFile>,
}

/// Index record plus the committed blob it points at.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub record: AssetRecord,
    pub blob: BlobMeta,
}

/// Validate an upload, persist the bytes as a chunked blob and index it
/// under the user-supplied title.
/// 校验上传、以分块 blob 持久化并按标题建立索引。
///
/// The blob store and the index are separate stores. A title is checked
/// for availability before any bytes are written, and if the index insert
/// still fails after the blob commit the blob is deleted again. A failed
/// delete leaves an unreferenced blob behind and is only logged.
pub struct UploadAsset {
    blob_store: Arc<dyn BlobStorePort>,
    asset_index: Arc<dyn AssetIndexPort>,
    clock: Arc<dyn ClockPort>,
    policy: UploadPolicy,
}

impl UploadAsset {
    pub fn new(
        blob_store: Arc<dyn BlobStorePort>,
        asset_index: Arc<dyn AssetIndexPort>,
        clock: Arc<dyn ClockPort>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            blob_store,
            asset_index,
            clock,
            policy,
        }
    }

    pub async fn execute(&self, request: UploadRequest) -> Result<UploadedAsset, AssetError> {
        let span = info_span!(
            "usecase.upload_asset.execute",
            title = request.title.as_deref().unwrap_or_default(),
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: UploadRequest) -> Result<UploadedAsset, AssetError> {
        let mut stage = UploadStage::ReceivingFile;

        let Some(file) = request.file else {
            return Err(reject(&mut stage, ValidationError::MissingFile.into()));
        };
        stage = stage.advance();
        debug!(%stage, filename = %file.original_name, bytes = file.data.len(), "File received");

        let (title, content_type) = match self.validate(request.title.as_deref(), &file) {
            Ok(validated) => validated,
            Err(err) => return Err(reject(&mut stage, err.into())),
        };

        match self.asset_index.find_by_title(&title).await {
            Ok(_) => {
                return Err(reject(
                    &mut stage,
                    AssetError::DuplicateTitle(title.to_string()),
                ))
            }
            Err(AssetIndexError::NotFound(_)) => {}
            Err(err) => return Err(reject(&mut stage, err.into())),
        }
        stage = stage.advance();

        let filename = stored_filename(self.clock.now_ms(), &file.original_name);
        let bytes = file.data.len();
        let source: ByteStream = futures::stream::once(async move { Ok(file.data) }).boxed();
        let blob = match self.blob_store.write(source, &filename, &content_type).await {
            Ok(blob) => blob,
            Err(err) => return Err(reject(&mut stage, err.into())),
        };
        debug!(%stage, blob_id = %blob.blob_id, filename = %filename, bytes, "Blob committed");
        stage = stage.advance();

        let new_record =
            NewAssetRecord::new(title, blob.blob_id.clone(), filename, self.clock.now());
        let record = match self.asset_index.insert(new_record).await {
            Ok(record) => record,
            Err(err) => {
                self.compensate(&blob).await;
                let err = match err {
                    AssetIndexError::Storage(msg) => AssetError::StorageWrite(msg),
                    other => other.into(),
                };
                return Err(reject(&mut stage, err));
            }
        };
        stage = stage.advance();

        info!(
            %stage,
            title = %record.title,
            blob_id = %record.blob_id,
            stored_filename = %record.stored_filename,
            bytes,
            "Model stored"
        );
        Ok(UploadedAsset { record, blob })
    }

    /// Title, then type, then size. Returns the parsed title and the
    /// content type to store.
    fn validate(
        &self,
        title: Option<&str>,
        file: &IncomingFile,
    ) -> Result<(AssetTitle, String), ValidationError> {
        let title = title
            .and_then(AssetTitle::parse)
            .ok_or(ValidationError::MissingField("title"))?;

        let content_type = file
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        self.policy.check_type(&file.original_name, &content_type)?;
        self.policy.check_size(file.data.len() as u64)?;

        Ok((title, content_type))
    }

    async fn compensate(&self, blob: &BlobMeta) {
        match self.blob_store.delete(&blob.blob_id).await {
            Ok(()) => info!(blob_id = %blob.blob_id, "Removed blob of failed upload"),
            Err(err) => warn!(
                blob_id = %blob.blob_id,
                error = %err,
                "Failed to remove blob of failed upload; leaving it unreferenced"
            ),
        }
    }
}

fn reject(stage: &mut UploadStage, err: AssetError) -> AssetError {
    let at = *stage;
    *stage = stage.reject();
    warn!(stage = %at, error = %err, "Upload rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use async_trait::async_trait;
    use mockall::mock;
    use mv_core::asset::DEFAULT_MAX_UPLOAD_BYTES;
    use mv_core::ports::BlobStoreError;
    use mv_core::{BlobId, BlobReadStream};
    use mv_infra::{InMemoryAssetIndex, InMemoryBlobStore, SystemClock};

    mock! {
        pub AssetIndex {}

        #[async_trait]
        impl AssetIndexPort for AssetIndex {
            async fn insert(&self, record: NewAssetRecord) -> Result<AssetRecord, AssetIndexError>;
            async fn find_by_title(&self, title: &AssetTitle) -> Result<AssetRecord, AssetIndexError>;
            async fn list_all(&self) -> Result<Vec<AssetRecord>, AssetIndexError>;
        }
    }

    mock! {
        pub BlobStore {}

        #[async_trait]
        impl BlobStorePort for BlobStore {
            async fn write(
                &self,
                source: ByteStream,
                filename: &str,
                content_type: &str,
            ) -> Result<BlobMeta, BlobStoreError>;
            async fn find_metadata(&self, filename: &str) -> Result<BlobMeta, BlobStoreError>;
            async fn open_read(&self, filename: &str) -> Result<BlobReadStream, BlobStoreError>;
            async fn delete(&self, blob_id: &BlobId) -> Result<(), BlobStoreError>;
        }
    }

    fn glb(name: &str, len: usize) -> IncomingFile {
        IncomingFile {
            original_name: name.to_string(),
            content_type: Some("model/gltf-binary".to_string()),
            data: Bytes::from(vec![7u8; len]),
        }
    }

    fn request(title: &str, file: IncomingFile) -> UploadRequest {
        UploadRequest {
            title: Some(title.to_string()),
            file: Some(file),
        }
    }

    fn in_memory() -> (UploadAsset, Arc<InMemoryBlobStore>, Arc<InMemoryAssetIndex>) {
        let clock = Arc::new(SystemClock);
        let blobs = Arc::new(InMemoryBlobStore::new(NonZeroUsize::new(1024).unwrap(), clock.clone()));
        let index = Arc::new(InMemoryAssetIndex::new());
        let usecase = UploadAsset::new(
            blobs.clone(),
            index.clone(),
            clock,
            UploadPolicy::default(),
        );
        (usecase, blobs, index)
    }

    fn fake_meta(filename: &str) -> BlobMeta {
        BlobMeta {
            blob_id: BlobId::from("blob-1"),
            filename: filename.to_string(),
            length: 4,
            chunk_size: 1024,
            content_type: "model/gltf-binary".to_string(),
            upload_date: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn stores_blob_then_indexes_title() {
        let (usecase, blobs, index) = in_memory();
        let uploaded = usecase
            .execute(request("Bee", glb("bee.glb", 3000)))
            .await
            .unwrap();

        assert_eq!(uploaded.record.title.as_str(), "Bee");
        assert_eq!(uploaded.record.blob_id, uploaded.blob.blob_id);
        assert_eq!(uploaded.record.stored_filename, uploaded.blob.filename);
        assert!(uploaded.blob.filename.ends_with("-bee.glb"));
        assert_eq!(uploaded.blob.length, 3000);
        assert_eq!(uploaded.blob.content_type, "model/gltf-binary");

        let meta = blobs.find_metadata(&uploaded.blob.filename).await.unwrap();
        assert_eq!(meta.blob_id, uploaded.blob.blob_id);
        assert_eq!(index.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_reported_first() {
        let (usecase, _, _) = in_memory();
        let err = usecase.execute(UploadRequest::default()).await.unwrap_err();
        assert!(matches!(
            err,
            AssetError::Validation(ValidationError::MissingFile)
        ));
    }

    #[tokio::test]
    async fn blank_title_is_missing_field() {
        let (usecase, _, _) = in_memory();
        let err = usecase
            .execute(request("   ", glb("bee.glb", 10)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AssetError::Validation(ValidationError::MissingField("title"))
        ));
    }

    #[tokio::test]
    async fn gltf_extension_is_rejected_despite_content_type() {
        let (usecase, blobs, _) = in_memory();
        let err = usecase
            .execute(request("Bee", glb("model.gltf", 10)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AssetError::Validation(ValidationError::UnsupportedType { .. })
        ));
        assert_eq!(blobs.orphan_chunk_count(), 0);
    }

    #[tokio::test]
    async fn size_ceiling_is_inclusive() {
        let (usecase, _, _) = in_memory();
        let limit = DEFAULT_MAX_UPLOAD_BYTES as usize;

        assert!(usecase
            .execute(request("Exact", glb("exact.glb", limit)))
            .await
            .is_ok());

        let err = usecase
            .execute(request("Over", glb("over.glb", limit + 1)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AssetError::Validation(ValidationError::PayloadTooLarge { size, limit: l })
                if size == limit as u64 + 1 && l == limit as u64
        ));
    }

    #[tokio::test]
    async fn duplicate_title_fails_before_writing() {
        let mut blobs = MockBlobStore::new();
        blobs.expect_write().never();
        let mut index = MockAssetIndex::new();
        index.expect_find_by_title().returning(|title| {
            Ok(NewAssetRecord::new(
                title.clone(),
                BlobId::from("existing"),
                "1-aaaaaaaa-bee.glb",
                chrono::Utc::now(),
            )
            .into_record())
        });

        let usecase = UploadAsset::new(
            Arc::new(blobs),
            Arc::new(index),
            Arc::new(SystemClock),
            UploadPolicy::default(),
        );
        let err = usecase
            .execute(request("Bee", glb("bee.glb", 10)))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::DuplicateTitle(t) if t == "Bee"));
    }

    #[tokio::test]
    async fn failed_index_insert_deletes_the_blob() {
        let mut blobs = MockBlobStore::new();
        blobs
            .expect_write()
            .times(1)
            .returning(|_, filename, _| Ok(fake_meta(filename)));
        blobs
            .expect_delete()
            .withf(|id| id.as_str() == "blob-1")
            .times(1)
            .returning(|_| Ok(()));

        let mut index = MockAssetIndex::new();
        index
            .expect_find_by_title()
            .returning(|title| Err(AssetIndexError::NotFound(title.to_string())));
        index
            .expect_insert()
            .times(1)
            .returning(|_| Err(AssetIndexError::Storage("disk full".to_string())));

        let usecase = UploadAsset::new(
            Arc::new(blobs),
            Arc::new(index),
            Arc::new(SystemClock),
            UploadPolicy::default(),
        );
        let err = usecase
            .execute(request("Bee", glb("bee.glb", 4)))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::StorageWrite(msg) if msg == "disk full"));
    }

    #[tokio::test]
    async fn lost_insert_race_still_reports_duplicate() {
        let mut blobs = MockBlobStore::new();
        blobs
            .expect_write()
            .returning(|_, filename, _| Ok(fake_meta(filename)));
        blobs
            .expect_delete()
            .times(1)
            .returning(|id| Err(BlobStoreError::NotFound(id.to_string())));

        let mut index = MockAssetIndex::new();
        index
            .expect_find_by_title()
            .returning(|title| Err(AssetIndexError::NotFound(title.to_string())));
        index
            .expect_insert()
            .returning(|r| Err(AssetIndexError::DuplicateTitle(r.title.to_string())));

        let usecase = UploadAsset::new(
            Arc::new(blobs),
            Arc::new(index),
            Arc::new(SystemClock),
            UploadPolicy::default(),
        );
        let err = usecase
            .execute(request("Bee", glb("bee.glb", 4)))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::DuplicateTitle(_)));
    }

    #[tokio::test]
    async fn missing_content_type_defaults_to_octet_stream() {
        let (usecase, _, _) = in_memory();
        let mut file = glb("bee.glb", 8);
        file.content_type = None;
        let uploaded = usecase.execute(request("Bee", file)).await.unwrap();
        assert_eq!(uploaded.blob.content_type, DEFAULT_CONTENT_TYPE);
    }
}
