use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::BlobId;

use super::AssetTitle;

/// Metadata entry mapping a user-facing title to a committed blob.
/// 用户可见标题到已提交 blob 的映射记录。
///
/// Records are immutable once created; `updated_at` equals `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub title: AssetTitle,
    pub blob_id: BlobId,
    pub stored_filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert command for the asset index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssetRecord {
    pub title: AssetTitle,
    pub blob_id: BlobId,
    pub stored_filename: String,
    pub created_at: DateTime<Utc>,
}

impl NewAssetRecord {
    pub fn new(
        title: AssetTitle,
        blob_id: BlobId,
        stored_filename: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title,
            blob_id,
            stored_filename: stored_filename.into(),
            created_at,
        }
    }

    /// The record as it looks once persisted.
    pub fn into_record(self) -> AssetRecord {
        AssetRecord {
            title: self.title,
            blob_id: self.blob_id,
            stored_filename: self.stored_filename,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
