use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use mv_core::blob::Chunker;
use mv_core::ports::{BlobStoreError, BlobStorePort, ClockPort};
use mv_core::{BlobId, BlobMeta, BlobReadStream, ByteStream};

#[derive(Default)]
struct State {
    /// Committed metadata keyed by filename.
    files: HashMap<String, BlobMeta>,
    chunks: HashMap<BlobId, Vec<Bytes>>,
}

/// Process-local blob store with the same commit semantics as the SQLite
/// store: chunks first, metadata last.
pub struct InMemoryBlobStore {
    chunk_size: NonZeroUsize,
    clock: Arc<dyn ClockPort>,
    state: RwLock<State>,
}

impl InMemoryBlobStore {
    pub fn new(chunk_size: NonZeroUsize, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            chunk_size,
            clock,
            state: RwLock::new(State::default()),
        }
    }

    /// Chunks stored without committed metadata.
    pub fn orphan_chunk_count(&self) -> usize {
        self.state
            .read()
            .map(|state| {
                let committed: Vec<&BlobId> = state.files.values().map(|m| &m.blob_id).collect();
                state
                    .chunks
                    .iter()
                    .filter(|(id, _)| !committed.contains(id))
                    .map(|(_, chunks)| chunks.len())
                    .sum()
            })
            .unwrap_or(0)
    }

    fn poisoned() -> BlobStoreError {
        BlobStoreError::Read("in-memory blob store lock poisoned".to_string())
    }
}

#[async_trait]
impl BlobStorePort for InMemoryBlobStore {
    async fn write(
        &self,
        mut source: ByteStream,
        filename: &str,
        content_type: &str,
    ) -> Result<BlobMeta, BlobStoreError> {
        let blob_id = BlobId::new();
        let mut chunker = Chunker::new(self.chunk_size);
        let mut length: u64 = 0;

        while let Some(piece) = source.next().await {
            let piece = piece
                .map_err(|e| BlobStoreError::Write(format!("source stream failed: {}", e)))?;
            length += piece.len() as u64;
            let ready = chunker.push(piece);
            if !ready.is_empty() {
                let mut state = self.state.write().map_err(|_| Self::poisoned())?;
                state.chunks.entry(blob_id.clone()).or_default().extend(ready);
            }
        }

        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        if let Some(tail) = chunker.finish() {
            state.chunks.entry(blob_id.clone()).or_default().push(tail);
        }
        if state.files.contains_key(filename) {
            return Err(BlobStoreError::Write(format!(
                "a blob named {} already exists",
                filename
            )));
        }

        let meta = BlobMeta {
            blob_id,
            filename: filename.to_string(),
            length,
            chunk_size: u32::try_from(self.chunk_size.get())
                .map_err(|_| BlobStoreError::Write("chunk size overflows u32".to_string()))?,
            content_type: content_type.to_string(),
            upload_date: self.clock.now(),
        };
        state.files.insert(filename.to_string(), meta.clone());
        Ok(meta)
    }

    async fn find_metadata(&self, filename: &str) -> Result<BlobMeta, BlobStoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        state
            .files
            .get(filename)
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound(filename.to_string()))
    }

    async fn open_read(&self, filename: &str) -> Result<BlobReadStream, BlobStoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        let meta = state
            .files
            .get(filename)
            .ok_or_else(|| BlobStoreError::NotFound(filename.to_string()))?;
        let chunks = state.chunks.get(&meta.blob_id).cloned().unwrap_or_default();
        if chunks.len() as u64 != meta.chunk_count() {
            return Err(BlobStoreError::Read(format!(
                "blob {} has {} chunks, expected {}",
                meta.blob_id,
                chunks.len(),
                meta.chunk_count()
            )));
        }
        Ok(futures::stream::iter(chunks.into_iter().map(Ok)).boxed())
    }

    async fn delete(&self, blob_id: &BlobId) -> Result<(), BlobStoreError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        let before = state.files.len();
        state.files.retain(|_, meta| &meta.blob_id != blob_id);
        state.chunks.remove(blob_id);
        if state.files.len() == before {
            return Err(BlobStoreError::NotFound(blob_id.to_string()));
        }
        Ok(())
    }
}
