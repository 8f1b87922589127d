use async_trait::async_trait;

use crate::asset::{AssetRecord, AssetTitle, NewAssetRecord};

use super::errors::AssetIndexError;

/// Title → blob index.
#[async_trait]
pub trait AssetIndexPort: Send + Sync {
    /// Fails with `DuplicateTitle` instead of overwriting.
    async fn insert(&self, record: NewAssetRecord) -> Result<AssetRecord, AssetIndexError>;

    async fn find_by_title(&self, title: &AssetTitle) -> Result<AssetRecord, AssetIndexError>;

    /// Newest first. An empty index yields an empty vector.
    async fn list_all(&self) -> Result<Vec<AssetRecord>, AssetIndexError>;
}
