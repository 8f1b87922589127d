use crate::db::mappers::AssetRowMapper;
use crate::db::models::AssetRow;
use crate::db::ports::{run_blocking, DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::assets;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use mv_core::ports::{AssetIndexError, AssetIndexPort};
use mv_core::{AssetRecord, AssetTitle, NewAssetRecord};
use tracing::debug;

fn storage_err(err: anyhow::Error) -> AssetIndexError {
    AssetIndexError::Storage(err.to_string())
}

/// SQLite-backed title index. The `title` primary key is what rejects
/// duplicates, so concurrent inserts of one title cannot both succeed.
pub struct DieselAssetRepository<E>
where
    E: DbExecutor,
{
    executor: E,
}

impl<E> DieselAssetRepository<E>
where
    E: DbExecutor,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl<E> AssetIndexPort for DieselAssetRepository<E>
where
    E: DbExecutor,
{
    async fn insert(&self, record: NewAssetRecord) -> Result<AssetRecord, AssetIndexError> {
        let new_row = AssetRowMapper.to_row(&record).map_err(storage_err)?;

        // Ok(false) means the title was already taken.
        let inserted = run_blocking(&self.executor, move |conn| {
            match diesel::insert_into(assets::table)
                .values(&new_row)
                .execute(conn)
            {
                Ok(_) => Ok(true),
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    Ok(false)
                }
                Err(e) => Err(anyhow::anyhow!("Database error: {}", e)),
            }
        })
        .await
        .map_err(storage_err)?;

        if !inserted {
            return Err(AssetIndexError::DuplicateTitle(
                record.title.as_str().to_string(),
            ));
        }
        debug!(title = %record.title, blob_id = %record.blob_id, "Asset record inserted");
        Ok(record.into_record())
    }

    async fn find_by_title(&self, title: &AssetTitle) -> Result<AssetRecord, AssetIndexError> {
        let key = title.as_str().to_string();
        let row: Option<AssetRow> = run_blocking(&self.executor, move |conn| {
            assets::table
                .filter(assets::title.eq(&key))
                .first::<AssetRow>(conn)
                .optional()
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))
        })
        .await
        .map_err(storage_err)?;

        match row {
            Some(row) => AssetRowMapper.to_domain(&row).map_err(storage_err),
            None => Err(AssetIndexError::NotFound(title.as_str().to_string())),
        }
    }

    async fn list_all(&self) -> Result<Vec<AssetRecord>, AssetIndexError> {
        let rows: Vec<AssetRow> = run_blocking(&self.executor, |conn| {
            assets::table
                .order((assets::created_at_ms.desc(), assets::title.asc()))
                .load::<AssetRow>(conn)
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))
        })
        .await
        .map_err(storage_err)?;

        rows.iter()
            .map(|row| AssetRowMapper.to_domain(row))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(storage_err)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use mv_core::ports::{AssetIndexError, AssetIndexPort};
    use mv_core::{AssetTitle, BlobId, NewAssetRecord};

    use crate::db::executor::DieselSqliteExecutor;
    use crate::db::pool::init_db_pool;

    use super::DieselAssetRepository;

    fn repo() -> DieselAssetRepository<DieselSqliteExecutor> {
        let pool = init_db_pool(":memory:").unwrap();
        DieselAssetRepository::new(DieselSqliteExecutor::new(pool))
    }

    fn record(title: &str, at_ms: i64) -> NewAssetRecord {
        NewAssetRecord::new(
            AssetTitle::parse(title).unwrap(),
            BlobId::new(),
            format!("{at_ms}-deadbeef-{title}.glb"),
            DateTime::from_timestamp_millis(at_ms).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_asset_repo_insert_and_find() {
        let repo = repo();
        let new = record("Bee", 1_000);
        let inserted = repo.insert(new.clone()).await.unwrap();
        assert_eq!(inserted.updated_at, inserted.created_at);

        let fetched = repo.find_by_title(&new.title).await.unwrap();
        assert_eq!(fetched, inserted);
    }

    #[tokio::test]
    async fn test_asset_repo_rejects_duplicate_title() {
        let repo = repo();
        repo.insert(record("Bee", 1_000)).await.unwrap();
        let err = repo.insert(record("Bee", 2_000)).await.unwrap_err();
        assert!(matches!(err, AssetIndexError::DuplicateTitle(t) if t == "Bee"));
    }

    #[tokio::test]
    async fn test_asset_repo_missing_title_is_not_found() {
        let repo = repo();
        let err = repo
            .find_by_title(&AssetTitle::parse("Nope").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AssetIndexError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_asset_repo_lists_newest_first() {
        let repo = repo();
        assert!(repo.list_all().await.unwrap().is_empty());

        repo.insert(record("Old", 1_000)).await.unwrap();
        repo.insert(record("New", 3_000)).await.unwrap();
        repo.insert(record("Mid", 2_000)).await.unwrap();

        let titles: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title.to_string())
            .collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }
}
