mod download_asset;
mod list_assets;
mod upload_asset;

pub use download_asset::{DownloadAsset, DownloadedAsset};
pub use list_assets::ListAssets;
pub use upload_asset::{IncomingFile, UploadAsset, UploadRequest, UploadedAsset};
