use anyhow::{anyhow, Result};
use mv_core::{BlobId, BlobMeta};

use super::time::{datetime_to_ms, ms_to_datetime};
use crate::db::models::{BlobFileRow, NewBlobFileRow};
use crate::db::ports::{InsertMapper, RowMapper};

pub struct BlobFileRowMapper;

impl InsertMapper<BlobMeta, NewBlobFileRow> for BlobFileRowMapper {
    fn to_row(&self, domain: &BlobMeta) -> Result<NewBlobFileRow> {
        Ok(NewBlobFileRow {
            blob_id: domain.blob_id.to_string(),
            filename: domain.filename.clone(),
            length: i64::try_from(domain.length)
                .map_err(|_| anyhow!("blob length overflows i64: {}", domain.length))?,
            chunk_size: i32::try_from(domain.chunk_size)
                .map_err(|_| anyhow!("chunk size overflows i32: {}", domain.chunk_size))?,
            content_type: domain.content_type.clone(),
            upload_date_ms: datetime_to_ms(&domain.upload_date),
        })
    }
}

impl RowMapper<BlobFileRow, BlobMeta> for BlobFileRowMapper {
    fn to_domain(&self, row: &BlobFileRow) -> Result<BlobMeta> {
        Ok(BlobMeta {
            blob_id: BlobId::from(row.blob_id.clone()),
            filename: row.filename.clone(),
            length: u64::try_from(row.length)
                .map_err(|_| anyhow!("negative blob length: {}", row.length))?,
            chunk_size: u32::try_from(row.chunk_size)
                .map_err(|_| anyhow!("negative chunk size: {}", row.chunk_size))?,
            content_type: row.content_type.clone(),
            upload_date: ms_to_datetime(row.upload_date_ms)?,
        })
    }
}
