use std::sync::Arc;

use mv_core::ports::AssetIndexPort;
use mv_core::AssetRecord;

use crate::error::AssetError;

/// Use case for listing every stored model, newest first
/// 列出所有已存储模型（最新优先）的用例
pub struct ListAssets {
    asset_index: Arc<dyn AssetIndexPort>,
}

impl ListAssets {
    pub fn new(asset_index: Arc<dyn AssetIndexPort>) -> Self {
        Self { asset_index }
    }

    /// An empty index is a successful, empty listing.
    pub async fn execute(&self) -> Result<Vec<AssetRecord>, AssetError> {
        let records = self.asset_index.list_all().await?;
        tracing::debug!(count = records.len(), "Listed models");
        Ok(records)
    }
}
