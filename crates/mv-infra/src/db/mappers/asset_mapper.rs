use anyhow::{anyhow, Result};
use mv_core::{AssetRecord, AssetTitle, BlobId, NewAssetRecord};

use super::time::{datetime_to_ms, ms_to_datetime};
use crate::db::models::{AssetRow, NewAssetRow};
use crate::db::ports::{InsertMapper, RowMapper};

pub struct AssetRowMapper;

impl InsertMapper<NewAssetRecord, NewAssetRow> for AssetRowMapper {
    fn to_row(&self, domain: &NewAssetRecord) -> Result<NewAssetRow> {
        let created_at_ms = datetime_to_ms(&domain.created_at);
        Ok(NewAssetRow {
            title: domain.title.as_str().to_string(),
            blob_id: domain.blob_id.to_string(),
            stored_filename: domain.stored_filename.clone(),
            created_at_ms,
            updated_at_ms: created_at_ms,
        })
    }
}

impl RowMapper<AssetRow, AssetRecord> for AssetRowMapper {
    fn to_domain(&self, row: &AssetRow) -> Result<AssetRecord> {
        let title = AssetTitle::parse(&row.title)
            .ok_or_else(|| anyhow!("stored asset has a blank title"))?;
        Ok(AssetRecord {
            title,
            blob_id: BlobId::from(row.blob_id.clone()),
            stored_filename: row.stored_filename.clone(),
            created_at: ms_to_datetime(row.created_at_ms)?,
            updated_at: ms_to_datetime(row.updated_at_ms)?,
        })
    }
}
