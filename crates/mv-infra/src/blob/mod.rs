mod chunked_store;
mod janitor;

pub use chunked_store::DieselChunkedBlobStore;
pub use janitor::OrphanChunkJanitor;
