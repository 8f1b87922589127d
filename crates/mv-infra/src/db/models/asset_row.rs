use crate::db::schema::assets;
use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = assets)]
pub struct AssetRow {
    pub title: String,
    pub blob_id: String,
    pub stored_filename: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Insertable)]
#[diesel(table_name = assets)]
pub struct NewAssetRow {
    pub title: String,
    pub blob_id: String,
    pub stored_filename: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}
