//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - Open the database and run migrations / 打开数据库并执行迁移
//! - Create infra implementations / 创建 infra 层具体实现
//! - Inject them into the use cases through port traits / 通过 Port trait 注入用例
//!
//! ## Architecture Principle / 架构原则
//!
//! > **This is the only place allowed to depend on mv-infra + mv-app simultaneously.**
//! > **这是唯一允许同时依赖 mv-infra 和 mv-app 的地方。**
//! > The privilege is for assembly only, not for decision making.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use mv_app::{AppDeps, UseCases};
use mv_core::config::AppConfig;
use mv_core::ports::ClockPort;
use mv_core::UploadPolicy;
use mv_infra::{
    init_db_pool, DieselAssetRepository, DieselChunkedBlobStore, DieselSqliteExecutor,
    OrphanChunkJanitor, SystemClock,
};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    #[error("Database directory could not be created: {0}")]
    DataDir(String),

    #[error("storage.chunk_size_bytes must be greater than zero")]
    InvalidChunkSize,
}

pub type Janitor = OrphanChunkJanitor<DieselSqliteExecutor>;

/// Fully assembled application, ready to serve.
/// 装配完成、可直接服务的应用。
pub struct WiredApp {
    pub use_cases: UseCases,
    /// `None` when `janitor.enabled` is false.
    pub janitor: Option<Arc<Janitor>>,
}

/// Build every storage adapter and the use cases on top of them.
///
/// Storage is confirmed ready (pool open, migrations applied) before this
/// returns, so nothing is routable against an unready database.
pub fn wire_dependencies(config: &AppConfig) -> WiringResult<WiredApp> {
    let chunk_size =
        NonZeroUsize::new(config.storage.chunk_size_bytes).ok_or(WiringError::InvalidChunkSize)?;
    ensure_parent_dir(&config.storage.database_url)?;

    let pool = init_db_pool(&config.storage.database_url)
        .map_err(|e| WiringError::DatabaseInit(format!("{e:#}")))?;
    let executor = DieselSqliteExecutor::new(pool);
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let blob_store = Arc::new(DieselChunkedBlobStore::new(
        executor.clone(),
        chunk_size,
        clock.clone(),
    ));
    let asset_index = Arc::new(DieselAssetRepository::new(executor.clone()));

    let janitor = config.janitor.enabled.then(|| {
        Arc::new(OrphanChunkJanitor::new(
            executor,
            clock.clone(),
            Duration::from_secs(config.janitor.grace_period_secs),
        ))
    });

    let use_cases = UseCases::new(AppDeps {
        blob_store,
        asset_index,
        clock,
        upload_policy: UploadPolicy::new(config.upload.max_bytes),
    });

    Ok(WiredApp { use_cases, janitor })
}

fn ensure_parent_dir(database_url: &str) -> WiringResult<()> {
    if database_url == ":memory:" {
        return Ok(());
    }
    match std::path::Path::new(database_url).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .map_err(|e| WiringError::DataDir(format!("{}: {e}", dir.display()))),
        _ => Ok(()),
    }
}
