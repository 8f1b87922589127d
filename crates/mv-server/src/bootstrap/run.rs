//! # Server Entry / 服务入口
//!
//! Startup order: configuration, tracing, storage, then the listener. The
//! router is only built once storage reports ready.
//! 启动顺序：配置、日志、存储、监听。存储就绪后才构建路由。

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use super::config::load_from_env;
use super::tracing::init_tracing_subscriber;
use super::wiring::wire_dependencies;
use crate::api::{build_router, AppState};

/// Load configuration, initialize storage and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = load_from_env()?;
    config.validate()?;

    init_tracing_subscriber(&config.logging)?;
    tracing::info!(
        bind_addr = %config.server.bind_addr,
        database_url = %config.storage.database_url,
        max_upload_bytes = config.upload.max_bytes,
        "Starting ModelVault"
    );

    let wired = wire_dependencies(&config).context("Storage initialization failed")?;
    tracing::info!("Storage ready");

    let janitor_task = wired.janitor.map(|janitor| {
        janitor.spawn(Duration::from_secs(config.janitor.interval_secs))
    });

    let router = build_router(AppState::new(wired.use_cases));
    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(task) = janitor_task {
        task.abort();
    }
    tracing::info!("ModelVault stopped");
    served.context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
