//! Wire shapes of the HTTP API (camelCase JSON).
//! HTTP API 的传输结构（camelCase JSON）。

use chrono::{DateTime, Utc};
use mv_app::usecases::UploadedAsset;
use mv_core::geometry::{CameraFit, NormalizeOptions, SceneNode};
use mv_core::{AssetRecord, BlobId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub filename: String,
    pub length: u64,
    pub content_type: String,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDto {
    pub title: String,
    pub blob_id: BlobId,
    pub stored_filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub file_info: FileInfo,
}

impl From<UploadedAsset> for ModelDto {
    fn from(uploaded: UploadedAsset) -> Self {
        let UploadedAsset { record, blob } = uploaded;
        Self {
            title: record.title.to_string(),
            blob_id: record.blob_id,
            stored_filename: record.stored_filename,
            created_at: record.created_at,
            updated_at: record.updated_at,
            file_info: FileInfo {
                filename: blob.filename,
                length: blob.length,
                content_type: blob.content_type,
                upload_date: blob.upload_date,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub model: ModelDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub success: bool,
    pub models: Vec<AssetRecord>,
}

/// Body of `POST /model/analyze`.
///
/// Camera parameters fall back to 16:9, margin 1.2 and a 60° FOV.
/// Normalization runs only when `targetSize` is given.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    pub scene: SceneNode,
    pub aspect_ratio: Option<f64>,
    pub margin: Option<f64>,
    pub fov: Option<f64>,
    pub target_size: Option<f64>,
    pub center_on_ground: Option<bool>,
}

impl AnalyzeBody {
    pub fn camera_fit(&self) -> CameraFit {
        let defaults = CameraFit::default();
        CameraFit {
            aspect_ratio: self.aspect_ratio.unwrap_or(defaults.aspect_ratio),
            margin: self.margin.unwrap_or(defaults.margin),
            fov_degrees: self.fov.unwrap_or(defaults.fov_degrees),
        }
    }

    pub fn normalize_options(&self) -> Option<NormalizeOptions> {
        self.target_size.map(|target_size| NormalizeOptions {
            target_size,
            center_on_ground: self
                .center_on_ground
                .unwrap_or(NormalizeOptions::default().center_on_ground),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
