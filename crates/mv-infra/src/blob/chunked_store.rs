//! SQLite chunked blob store.
//! 基于 SQLite 的分块 blob 存储。
//!
//! Bytes land in `blob_chunks` as they arrive; the `blob_files` row is
//! inserted last and is the only thing readers look up, so a blob whose
//! upload died halfway never becomes visible.
//!
//! Every batch re-stamps the blob's earlier chunks, which keeps a live
//! write inside the janitor's grace period. A write that stalls longer than
//! that can still lose chunks, so the commit re-counts them and refuses to
//! publish an incomplete blob.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use diesel::dsl::sql;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::BigInt;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use futures::StreamExt;
use mv_core::blob::Chunker;
use mv_core::ports::{BlobStoreError, BlobStorePort, ClockPort};
use mv_core::{BlobId, BlobMeta, BlobReadStream, ByteStream};
use tracing::{debug, warn};

use crate::db::mappers::BlobFileRowMapper;
use crate::db::models::{BlobFileRow, NewBlobChunkRow};
use crate::db::ports::{run_blocking, DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::{assets, blob_chunks, blob_files};

pub struct DieselChunkedBlobStore<E>
where
    E: DbExecutor,
{
    executor: E,
    chunk_size: NonZeroUsize,
    clock: Arc<dyn ClockPort>,
}

/// Result of the final commit transaction.
enum CommitOutcome {
    Committed,
    DuplicateFilename,
    /// Chunks went missing while the write was in flight.
    Incomplete { chunks: i64, bytes: i64 },
}

impl<E> DieselChunkedBlobStore<E>
where
    E: DbExecutor,
{
    pub fn new(executor: E, chunk_size: NonZeroUsize, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            executor,
            chunk_size,
            clock,
        }
    }

    async fn insert_chunks(
        &self,
        blob_id: &BlobId,
        first_seq: i64,
        chunks: Vec<Bytes>,
    ) -> Result<(), BlobStoreError> {
        let blob_id = blob_id.to_string();
        let created_at_ms = self.clock.now_ms();
        run_blocking(&self.executor, move |conn| {
            conn.immediate_transaction::<_, DieselError, _>(|conn| {
                diesel::update(blob_chunks::table.filter(blob_chunks::blob_id.eq(&blob_id)))
                    .set(blob_chunks::created_at_ms.eq(created_at_ms))
                    .execute(conn)?;
                for (offset, data) in chunks.iter().enumerate() {
                    diesel::insert_into(blob_chunks::table)
                        .values(&NewBlobChunkRow {
                            blob_id: &blob_id,
                            seq: first_seq + offset as i64,
                            data,
                            created_at_ms,
                        })
                        .execute(conn)?;
                }
                Ok(())
            })
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))
        })
        .await
        .map_err(|e| BlobStoreError::Write(e.to_string()))
    }

    async fn load_meta(&self, filename: &str) -> Result<BlobMeta, BlobStoreError> {
        let key = filename.to_string();
        let row: Option<BlobFileRow> = run_blocking(&self.executor, move |conn| {
            blob_files::table
                .filter(blob_files::filename.eq(&key))
                .first::<BlobFileRow>(conn)
                .optional()
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))
        })
        .await
        .map_err(|e| BlobStoreError::Read(e.to_string()))?;

        match row {
            Some(row) => BlobFileRowMapper
                .to_domain(&row)
                .map_err(|e| BlobStoreError::Read(e.to_string())),
            None => Err(BlobStoreError::NotFound(filename.to_string())),
        }
    }
}

/// Cursor threaded through the read stream.
struct ReadCursor<E> {
    executor: E,
    meta: BlobMeta,
    seq: u64,
}

async fn next_chunk<E>(
    mut cursor: ReadCursor<E>,
) -> Result<Option<(Bytes, ReadCursor<E>)>, BlobStoreError>
where
    E: DbExecutor,
{
    if cursor.seq >= cursor.meta.chunk_count() {
        return Ok(None);
    }

    let blob_id = cursor.meta.blob_id.to_string();
    let seq = cursor.seq as i64;
    let data: Option<Vec<u8>> = run_blocking(&cursor.executor, move |conn| {
        blob_chunks::table
            .filter(blob_chunks::blob_id.eq(&blob_id))
            .filter(blob_chunks::seq.eq(seq))
            .select(blob_chunks::data)
            .first::<Vec<u8>>(conn)
            .optional()
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))
    })
    .await
    .map_err(|e| BlobStoreError::Read(e.to_string()))?;

    let data = data.ok_or_else(|| {
        BlobStoreError::Read(format!(
            "blob {} is missing chunk {}",
            cursor.meta.blob_id, cursor.seq
        ))
    })?;

    let expected = cursor.meta.expected_chunk_len(cursor.seq);
    if data.len() as u64 != expected {
        return Err(BlobStoreError::Read(format!(
            "blob {} chunk {} has {} bytes, expected {}",
            cursor.meta.blob_id,
            cursor.seq,
            data.len(),
            expected
        )));
    }

    cursor.seq += 1;
    Ok(Some((Bytes::from(data), cursor)))
}

enum DeleteOutcome {
    Deleted,
    Missing,
    Referenced,
}

#[async_trait]
impl<E> BlobStorePort for DieselChunkedBlobStore<E>
where
    E: DbExecutor,
{
    async fn write(
        &self,
        mut source: ByteStream,
        filename: &str,
        content_type: &str,
    ) -> Result<BlobMeta, BlobStoreError> {
        let blob_id = BlobId::new();
        let mut chunker = Chunker::new(self.chunk_size);
        let mut next_seq: i64 = 0;
        let mut length: u64 = 0;

        while let Some(piece) = source.next().await {
            let piece = piece
                .map_err(|e| BlobStoreError::Write(format!("source stream failed: {}", e)))?;
            length += piece.len() as u64;
            let ready = chunker.push(piece);
            if ready.is_empty() {
                continue;
            }
            let count = ready.len() as i64;
            self.insert_chunks(&blob_id, next_seq, ready).await?;
            next_seq += count;
        }
        if let Some(tail) = chunker.finish() {
            self.insert_chunks(&blob_id, next_seq, vec![tail]).await?;
            next_seq += 1;
        }

        let meta = BlobMeta {
            blob_id: blob_id.clone(),
            filename: filename.to_string(),
            length,
            chunk_size: u32::try_from(self.chunk_size.get())
                .map_err(|_| BlobStoreError::Write("chunk size overflows u32".to_string()))?,
            content_type: content_type.to_string(),
            upload_date: self.clock.now(),
        };
        let row = BlobFileRowMapper
            .to_row(&meta)
            .map_err(|e| BlobStoreError::Write(e.to_string()))?;
        let expected_chunks = next_seq;
        let expected_bytes = row.length;

        let outcome = run_blocking(&self.executor, move |conn| {
            conn.immediate_transaction::<_, DieselError, _>(|conn| {
                let chunks: i64 = blob_chunks::table
                    .filter(blob_chunks::blob_id.eq(&row.blob_id))
                    .count()
                    .get_result(conn)?;
                let bytes: i64 = blob_chunks::table
                    .filter(blob_chunks::blob_id.eq(&row.blob_id))
                    .select(sql::<BigInt>("COALESCE(SUM(LENGTH(data)), 0)"))
                    .first(conn)?;
                if chunks != expected_chunks || bytes != expected_bytes {
                    diesel::delete(
                        blob_chunks::table.filter(blob_chunks::blob_id.eq(&row.blob_id)),
                    )
                    .execute(conn)?;
                    return Ok(CommitOutcome::Incomplete { chunks, bytes });
                }
                match diesel::insert_into(blob_files::table)
                    .values(&row)
                    .execute(conn)
                {
                    Ok(_) => Ok(CommitOutcome::Committed),
                    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                        Ok(CommitOutcome::DuplicateFilename)
                    }
                    Err(e) => Err(e),
                }
            })
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))
        })
        .await
        .map_err(|e| BlobStoreError::Write(e.to_string()))?;

        match outcome {
            CommitOutcome::Committed => {}
            CommitOutcome::DuplicateFilename => {
                return Err(BlobStoreError::Write(format!(
                    "a blob named {} already exists",
                    meta.filename
                )))
            }
            CommitOutcome::Incomplete { chunks, bytes } => {
                warn!(
                    blob_id = %meta.blob_id,
                    filename = %meta.filename,
                    chunks,
                    expected_chunks,
                    bytes,
                    expected_bytes,
                    "Chunks vanished during write; blob not committed"
                );
                return Err(BlobStoreError::Write(format!(
                    "blob {} lost chunks before commit: {} of {} chunks, {} of {} bytes",
                    meta.blob_id, chunks, expected_chunks, bytes, expected_bytes
                )));
            }
        }

        debug!(
            blob_id = %meta.blob_id,
            filename = %meta.filename,
            length = meta.length,
            chunks = next_seq,
            "Blob committed"
        );
        Ok(meta)
    }

    async fn find_metadata(&self, filename: &str) -> Result<BlobMeta, BlobStoreError> {
        self.load_meta(filename).await
    }

    async fn open_read(&self, filename: &str) -> Result<BlobReadStream, BlobStoreError> {
        let meta = self.load_meta(filename).await?;
        let cursor = ReadCursor {
            executor: self.executor.clone(),
            meta,
            seq: 0,
        };
        Ok(futures::stream::try_unfold(cursor, next_chunk).boxed())
    }

    async fn delete(&self, blob_id: &BlobId) -> Result<(), BlobStoreError> {
        let key = blob_id.to_string();
        let outcome = run_blocking(&self.executor, move |conn| {
            conn.immediate_transaction::<_, DieselError, _>(|conn| {
                let references: i64 = assets::table
                    .filter(assets::blob_id.eq(&key))
                    .count()
                    .get_result(conn)?;
                if references > 0 {
                    return Ok(DeleteOutcome::Referenced);
                }
                let files = diesel::delete(blob_files::table.filter(blob_files::blob_id.eq(&key)))
                    .execute(conn)?;
                diesel::delete(blob_chunks::table.filter(blob_chunks::blob_id.eq(&key)))
                    .execute(conn)?;
                Ok(if files == 0 {
                    DeleteOutcome::Missing
                } else {
                    DeleteOutcome::Deleted
                })
            })
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))
        })
        .await
        .map_err(|e| BlobStoreError::Write(e.to_string()))?;

        match outcome {
            DeleteOutcome::Deleted => {
                debug!(blob_id = %blob_id, "Blob deleted");
                Ok(())
            }
            DeleteOutcome::Missing => Err(BlobStoreError::NotFound(blob_id.to_string())),
            DeleteOutcome::Referenced => {
                warn!(blob_id = %blob_id, "Refusing to delete a referenced blob");
                Err(BlobStoreError::StillReferenced(blob_id.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use crate::db::executor::DieselSqliteExecutor;
    use crate::db::pool::init_db_pool;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct FixedClock(AtomicI64);

    impl ClockPort for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn store(chunk_size: usize) -> DieselChunkedBlobStore<DieselSqliteExecutor> {
        let pool = init_db_pool(":memory:").unwrap();
        DieselChunkedBlobStore::new(
            DieselSqliteExecutor::new(pool),
            NonZeroUsize::new(chunk_size).unwrap(),
            Arc::new(FixedClock(AtomicI64::new(1_000))),
        )
    }

    fn source(pieces: &[&'static str]) -> ByteStream {
        let pieces: Vec<std::io::Result<Bytes>> = pieces
            .iter()
            .map(|p| Ok(Bytes::from_static(p.as_bytes())))
            .collect();
        futures::stream::iter(pieces).boxed()
    }

    async fn read_all(stream: BlobReadStream) -> Result<Vec<u8>, BlobStoreError> {
        let chunks: Vec<Bytes> = stream.try_collect().await?;
        Ok(chunks.concat())
    }

    #[tokio::test]
    async fn write_then_read_returns_identical_bytes() {
        let store = store(4);
        let meta = store
            .write(source(&["abc", "defgh", "ij"]), "f.glb", "model/gltf-binary")
            .await
            .unwrap();
        assert_eq!(meta.length, 10);
        assert_eq!(meta.chunk_size, 4);
        assert_eq!(meta.chunk_count(), 3);

        let bytes = read_all(store.open_read("f.glb").await.unwrap()).await.unwrap();
        assert_eq!(bytes, b"abcdefghij");
    }

    #[tokio::test]
    async fn stream_yields_one_chunk_per_poll() {
        let store = store(4);
        store
            .write(source(&["abcdefghij"]), "f.glb", "model/gltf-binary")
            .await
            .unwrap();
        let mut stream = store.open_read("f.glb").await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from_static(b"abcd"));
        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from_static(b"efgh"));
        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from_static(b"ij"));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn empty_blob_has_no_chunks() {
        let store = store(4);
        let meta = store
            .write(source(&[]), "empty.glb", "model/gltf-binary")
            .await
            .unwrap();
        assert_eq!(meta.length, 0);
        let bytes = read_all(store.open_read("empty.glb").await.unwrap()).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn failed_source_leaves_blob_invisible() {
        let store = store(4);
        let failing: ByteStream = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"abcdefgh")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "client gone")),
        ])
        .boxed();
        let err = store
            .write(failing, "half.glb", "model/gltf-binary")
            .await
            .unwrap_err();
        assert!(matches!(err, BlobStoreError::Write(_)));
        assert!(matches!(
            store.find_metadata("half.glb").await,
            Err(BlobStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn missing_chunk_surfaces_read_error() {
        let store = store(4);
        let meta = store
            .write(source(&["abcdefghij"]), "f.glb", "model/gltf-binary")
            .await
            .unwrap();
        let blob_id = meta.blob_id.to_string();
        store
            .executor
            .run(move |conn| {
                diesel::delete(
                    blob_chunks::table
                        .filter(blob_chunks::blob_id.eq(&blob_id))
                        .filter(blob_chunks::seq.eq(1_i64)),
                )
                .execute(conn)?;
                Ok(())
            })
            .unwrap();

        let mut stream = store.open_read("f.glb").await.unwrap();
        assert!(stream.next().await.unwrap().is_ok());
        assert!(matches!(
            stream.next().await.unwrap(),
            Err(BlobStoreError::Read(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_blob_and_chunks() {
        let store = store(4);
        let meta = store
            .write(source(&["abcdefghij"]), "f.glb", "model/gltf-binary")
            .await
            .unwrap();
        store.delete(&meta.blob_id).await.unwrap();
        assert!(matches!(
            store.find_metadata("f.glb").await,
            Err(BlobStoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(&meta.blob_id).await,
            Err(BlobStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_refuses_referenced_blob() {
        let store = store(4);
        let meta = store
            .write(source(&["abcd"]), "f.glb", "model/gltf-binary")
            .await
            .unwrap();
        let blob_id = meta.blob_id.to_string();
        store
            .executor
            .run(move |conn| {
                diesel::insert_into(assets::table)
                    .values((
                        assets::title.eq("Bee"),
                        assets::blob_id.eq(&blob_id),
                        assets::stored_filename.eq("f.glb"),
                        assets::created_at_ms.eq(1_i64),
                        assets::updated_at_ms.eq(1_i64),
                    ))
                    .execute(conn)?;
                Ok(())
            })
            .unwrap();

        assert!(matches!(
            store.delete(&meta.blob_id).await,
            Err(BlobStoreError::StillReferenced(_))
        ));
        assert!(store.find_metadata("f.glb").await.is_ok());
    }
}
