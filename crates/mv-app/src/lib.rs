//! ModelVault Application Layer
//!
//! Use cases for storing, serving, listing and analyzing 3D model assets.
//! Every use case talks to storage through `mv-core` ports only.

pub mod deps;
pub mod error;
pub mod usecases;

pub use deps::{AppDeps, UseCases};
pub use error::AssetError;
