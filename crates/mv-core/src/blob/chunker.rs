use std::num::NonZeroUsize;

use bytes::{Bytes, BytesMut};

/// Splits an incoming byte sequence into fixed-size chunks.
///
/// Pieces that arrive chunk-aligned are sliced without copying; only the
/// tail of a piece that straddles a chunk boundary is buffered.
#[derive(Debug)]
pub struct Chunker {
    chunk_size: usize,
    pending: BytesMut,
}

impl Chunker {
    pub fn new(chunk_size: NonZeroUsize) -> Self {
        Self {
            chunk_size: chunk_size.get(),
            pending: BytesMut::new(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Feed a piece, returning every chunk it completed.
    pub fn push(&mut self, mut piece: Bytes) -> Vec<Bytes> {
        let mut ready = Vec::new();
        while !piece.is_empty() {
            if self.pending.is_empty() && piece.len() >= self.chunk_size {
                ready.push(piece.split_to(self.chunk_size));
                continue;
            }
            let take = (self.chunk_size - self.pending.len()).min(piece.len());
            self.pending.extend_from_slice(&piece.split_to(take));
            if self.pending.len() == self.chunk_size {
                ready.push(self.pending.split().freeze());
            }
        }
        ready
    }

    /// The final, possibly short, chunk.
    pub fn finish(self) -> Option<Bytes> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.freeze())
        }
    }
}
