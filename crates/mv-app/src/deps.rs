//! # Application Dependencies / 应用依赖
//!
//! Parameter grouping for use-case construction. Storage handles are built
//! explicitly at startup and passed in here; nothing is looked up globally.
//! 用例构造的参数分组。存储句柄在启动时显式构建并传入。

use std::sync::Arc;

use mv_core::ports::{AssetIndexPort, BlobStorePort, ClockPort};
use mv_core::UploadPolicy;

use crate::usecases::{AnalyzeGeometry, DownloadAsset, ListAssets, UploadAsset};

/// Application dependency grouping (non-Builder, just parameter grouping)
/// 应用依赖分组（非 Builder，仅参数打包）
pub struct AppDeps {
    // Storage dependencies / 存储依赖
    pub blob_store: Arc<dyn BlobStorePort>,
    pub asset_index: Arc<dyn AssetIndexPort>,

    // System dependencies / 系统依赖
    pub clock: Arc<dyn ClockPort>,

    // Policy / 策略
    pub upload_policy: UploadPolicy,
}

/// Use-case accessor shared by transport handlers.
/// 供传输层处理器共享的用例访问器。
#[derive(Clone)]
pub struct UseCases {
    deps: Arc<AppDeps>,
}

impl UseCases {
    pub fn new(deps: AppDeps) -> Self {
        Self {
            deps: Arc::new(deps),
        }
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.deps.upload_policy
    }

    pub fn upload_asset(&self) -> UploadAsset {
        UploadAsset::new(
            self.deps.blob_store.clone(),
            self.deps.asset_index.clone(),
            self.deps.clock.clone(),
            self.deps.upload_policy.clone(),
        )
    }

    pub fn download_asset(&self) -> DownloadAsset {
        DownloadAsset::new(self.deps.asset_index.clone(), self.deps.blob_store.clone())
    }

    pub fn list_assets(&self) -> ListAssets {
        ListAssets::new(self.deps.asset_index.clone())
    }

    pub fn analyze_geometry(&self) -> AnalyzeGeometry {
        AnalyzeGeometry::new()
    }
}
