use crate::db::schema::{blob_chunks, blob_files};
use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = blob_files)]
pub struct BlobFileRow {
    pub blob_id: String,
    pub filename: String,
    pub length: i64,
    pub chunk_size: i32,
    pub content_type: String,
    pub upload_date_ms: i64,
}

#[derive(Insertable)]
#[diesel(table_name = blob_files)]
pub struct NewBlobFileRow {
    pub blob_id: String,
    pub filename: String,
    pub length: i64,
    pub chunk_size: i32,
    pub content_type: String,
    pub upload_date_ms: i64,
}

#[derive(Insertable)]
#[diesel(table_name = blob_chunks)]
pub struct NewBlobChunkRow<'a> {
    pub blob_id: &'a str,
    pub seq: i64,
    pub data: &'a [u8],
    pub created_at_ms: i64,
}
