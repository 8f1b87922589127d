use thiserror::Error;

use crate::ids::BlobId;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// No committed metadata for the filename.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// A chunk or the commit record could not be persisted. Chunks written
    /// before the failure stay invisible and are left for the orphan janitor.
    #[error("blob write failed: {0}")]
    Write(String),

    #[error("blob read failed: {0}")]
    Read(String),

    #[error("blob {0} is still referenced by an asset record")]
    StillReferenced(BlobId),
}

#[derive(Debug, Error)]
pub enum AssetIndexError {
    #[error("an asset titled {0:?} already exists")]
    DuplicateTitle(String),

    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}
