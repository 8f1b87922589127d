pub mod asset;
pub mod geometry;

pub use asset::{
    DownloadAsset, DownloadedAsset, IncomingFile, ListAssets, UploadAsset, UploadRequest,
    UploadedAsset,
};
pub use geometry::{AnalysisReport, AnalyzeGeometry, AnalyzeRequest};
