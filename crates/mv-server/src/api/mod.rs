//! # HTTP API / HTTP 接口
//!
//! Thin transport layer: extract, call one use case, map the result.
//! 薄传输层：提取参数、调用用例、映射结果。

pub mod dto;
mod error;
mod handlers;
mod router;
mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
