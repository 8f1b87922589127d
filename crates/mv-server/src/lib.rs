//! # mv-server
//!
//! HTTP adapter layer for ModelVault.
//!
//! ## Modules
//!
//! - **api**: axum router, handlers, DTOs and error → status mapping
//! - **bootstrap**: configuration, tracing, dependency wiring and the run loop

pub mod api;
pub mod bootstrap;

pub use api::{build_router, AppState};
