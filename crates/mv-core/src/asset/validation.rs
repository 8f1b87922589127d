use thiserror::Error;

/// User-fixable input problems detected before any storage mutation.
/// 在任何存储变更之前检测到的输入错误（用户可修正）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("File type not allowed: {filename} ({content_type}). Please upload a .glb file")]
    UnsupportedType {
        filename: String,
        content_type: String,
    },

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },
}
