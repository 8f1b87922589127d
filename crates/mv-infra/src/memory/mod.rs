//! In-memory adapters for tests and ephemeral runs.
//! 用于测试与临时运行的内存实现。

mod asset_index;
mod blob_store;

pub use asset_index::InMemoryAssetIndex;
pub use blob_store::InMemoryBlobStore;
