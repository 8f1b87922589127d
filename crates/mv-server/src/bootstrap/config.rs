//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - Read the optional TOML configuration file / 读取可选的 TOML 配置文件
//! - Apply environment overrides / 应用环境变量覆盖
//! - Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! Range checks live in `AppConfig::validate`, called by the run loop.
//! 取值范围检查由 `AppConfig::validate` 负责，在启动流程中调用。

use std::path::{Path, PathBuf};

use anyhow::Context;
use mv_core::config::AppConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "MODELVAULT_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "modelvault.toml";

/// Config file path from `MODELVAULT_CONFIG`, or `modelvault.toml`.
pub fn config_path_from_env() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// A missing file yields the built-in defaults. Sections and keys absent
/// from the file keep their defaults.
/// 文件不存在时使用内置默认值；文件中缺失的部分保持默认值。
///
/// # Errors / 错误
///
/// Returns error if the file exists but cannot be read or is not valid
/// TOML for `AppConfig`.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Apply `MODELVAULT_*` and `PORT` overrides read through `lookup`.
/// 通过 `lookup` 读取并应用 `MODELVAULT_*` 与 `PORT` 覆盖。
pub fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<AppConfig> {
    if let Some(port) = lookup("PORT") {
        let port: u16 = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid PORT: {port}"))?;
        config.server.bind_addr = format!("0.0.0.0:{port}");
    }
    if let Some(addr) = lookup("MODELVAULT_BIND_ADDR") {
        config.server.bind_addr = addr;
    }
    if let Some(url) = lookup("MODELVAULT_DATABASE_URL") {
        config.storage.database_url = url;
    }
    if let Some(size) = lookup("MODELVAULT_CHUNK_SIZE_BYTES") {
        config.storage.chunk_size_bytes = parse_env("MODELVAULT_CHUNK_SIZE_BYTES", &size)?;
    }
    if let Some(max) = lookup("MODELVAULT_MAX_UPLOAD_BYTES") {
        config.upload.max_bytes = parse_env("MODELVAULT_MAX_UPLOAD_BYTES", &max)?;
    }
    if let Some(enabled) = lookup("MODELVAULT_JANITOR_ENABLED") {
        config.janitor.enabled = parse_env("MODELVAULT_JANITOR_ENABLED", &enabled)?;
    }
    if let Some(dir) = lookup("MODELVAULT_LOG_DIR") {
        config.logging.dir = Some(PathBuf::from(dir));
    }
    Ok(config)
}

fn parse_env<T>(name: &str, raw: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid {name}: {raw}"))
}

/// File, then process environment.
pub fn load_from_env() -> anyhow::Result<AppConfig> {
    let path = config_path_from_env();
    let config = load_config(&path)?;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}
