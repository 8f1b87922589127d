//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure
//! implementations. Use cases only ever see these traits, so every store can
//! be swapped for an in-memory fake in tests.

mod asset_index;
mod blob_store;
mod clock;
pub mod errors;

pub use asset_index::AssetIndexPort;
pub use blob_store::BlobStorePort;
pub use clock::ClockPort;
pub use errors::{AssetIndexError, BlobStoreError};
