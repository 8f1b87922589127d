//! Use-case error taxonomy.
//! 用例错误分类。

use mv_core::geometry::GeometryError;
use mv_core::ports::{AssetIndexError, BlobStoreError};
use mv_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    /// Bad or missing input, detected before any storage mutation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A model titled {0:?} already exists")]
    DuplicateTitle(String),

    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    #[error("Storage read failed: {0}")]
    StorageRead(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl From<BlobStoreError> for AssetError {
    fn from(err: BlobStoreError) -> Self {
        match err {
            BlobStoreError::NotFound(what) => Self::NotFound(what),
            BlobStoreError::Read(msg) => Self::StorageRead(msg),
            BlobStoreError::Write(msg) => Self::StorageWrite(msg),
            err @ BlobStoreError::StillReferenced(_) => Self::StorageWrite(err.to_string()),
        }
    }
}

impl From<AssetIndexError> for AssetError {
    fn from(err: AssetIndexError) -> Self {
        match err {
            AssetIndexError::DuplicateTitle(title) => Self::DuplicateTitle(title),
            AssetIndexError::NotFound(title) => Self::NotFound(title),
            AssetIndexError::Storage(msg) => Self::StorageRead(msg),
        }
    }
}
