//! Asset domain: index records, titles, upload admission.

mod record;
mod stored_filename;
mod title;
mod upload_policy;
mod upload_stage;
mod validation;

pub use record::{AssetRecord, NewAssetRecord};
pub use stored_filename::{sanitize_filename, stored_filename};
pub use title::AssetTitle;
pub use upload_policy::{
    UploadPolicy, ALLOWED_CONTENT_TYPES, ALLOWED_EXTENSION, DEFAULT_MAX_UPLOAD_BYTES,
};
pub use upload_stage::{RejectedAt, UploadStage};
pub use validation::ValidationError;
