use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use mv_core::ports::{AssetIndexError, AssetIndexPort};
use mv_core::{AssetRecord, AssetTitle, NewAssetRecord};

/// Process-local title index.
#[derive(Default)]
pub struct InMemoryAssetIndex {
    records: RwLock<HashMap<String, AssetRecord>>,
}

impl InMemoryAssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> AssetIndexError {
        AssetIndexError::Storage("in-memory asset index lock poisoned".to_string())
    }
}

#[async_trait]
impl AssetIndexPort for InMemoryAssetIndex {
    async fn insert(&self, record: NewAssetRecord) -> Result<AssetRecord, AssetIndexError> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        let key = record.title.as_str().to_string();
        if records.contains_key(&key) {
            return Err(AssetIndexError::DuplicateTitle(key));
        }
        let record = record.into_record();
        records.insert(key, record.clone());
        Ok(record)
    }

    async fn find_by_title(&self, title: &AssetTitle) -> Result<AssetRecord, AssetIndexError> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        records
            .get(title.as_str())
            .cloned()
            .ok_or_else(|| AssetIndexError::NotFound(title.as_str().to_string()))
    }

    async fn list_all(&self) -> Result<Vec<AssetRecord>, AssetIndexError> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        let mut all: Vec<AssetRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.title.as_str().cmp(b.title.as_str()))
        });
        Ok(all)
    }
}
