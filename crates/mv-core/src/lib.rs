//! # mv-core
//!
//! Core domain models and business logic for ModelVault.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod asset;
pub mod blob;
pub mod config;
pub mod geometry;
pub mod ids;
pub mod ports;

// Re-export commonly used types at the crate root
pub use asset::{AssetRecord, AssetTitle, NewAssetRecord, UploadPolicy, ValidationError};
pub use blob::{BlobMeta, BlobReadStream, ByteStream};
pub use config::AppConfig;
pub use ids::BlobId;
