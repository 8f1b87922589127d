//! Application configuration domain model

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::asset::DEFAULT_MAX_UPLOAD_BYTES;
use crate::blob::DEFAULT_CHUNK_SIZE;

/// Application configuration
///
/// Every section has defaults so a missing config file still yields a
/// runnable server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
    pub janitor: JanitorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to
    pub bind_addr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path, or `:memory:`
    pub database_url: String,

    /// Fixed size of every chunk except a blob's last one
    pub chunk_size_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Inclusive payload ceiling
    pub max_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    /// Minimum age of an unreferenced chunk before it is reclaimed, so that
    /// in-flight uploads are never swept
    pub grace_period_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, logs are also written to `<dir>/modelvault.log`
    pub dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "data/modelvault.db".to_string(),
            chunk_size_bytes: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 3600,
            grace_period_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Reject values no component can run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.chunk_size_bytes == 0 {
            anyhow::bail!("storage.chunk_size_bytes must be greater than zero");
        }
        if self.storage.chunk_size_bytes > u32::MAX as usize {
            anyhow::bail!("storage.chunk_size_bytes must fit in 32 bits");
        }
        if self.upload.max_bytes == 0 {
            anyhow::bail!("upload.max_bytes must be greater than zero");
        }
        if self.janitor.enabled && self.janitor.interval_secs == 0 {
            anyhow::bail!("janitor.interval_secs must be greater than zero");
        }
        Ok(())
    }
}
