//! # mv-infra
//!
//! Storage adapters for ModelVault: SQLite chunked blob store, asset index,
//! orphan chunk janitor, in-memory fakes and the system clock.

pub mod blob;
pub mod db;
pub mod memory;
pub mod time;

pub use blob::{DieselChunkedBlobStore, OrphanChunkJanitor};
pub use db::executor::DieselSqliteExecutor;
pub use db::pool::{init_db_pool, DbPool};
pub use db::repositories::DieselAssetRepository;
pub use memory::{InMemoryAssetIndex, InMemoryBlobStore};
pub use time::SystemClock;
