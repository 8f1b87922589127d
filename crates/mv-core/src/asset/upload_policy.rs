//! Upload admission rules: type allow-list and size ceiling.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

pub const ALLOWED_EXTENSION: &str = "glb";

pub const ALLOWED_CONTENT_TYPES: [&str; 3] = [
    "model/gltf-binary",
    "model/gltf+json",
    "application/octet-stream",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Type check.
    ///
    /// A file extension, when present, decides on its own: `.glb` (any case)
    /// is accepted and every other extension is rejected whatever the declared
    /// content type says. Extensionless files fall back to the MIME allow-list.
    pub fn check_type(&self, filename: &str, content_type: &str) -> Result<(), ValidationError> {
        let allowed = match extension_of(filename) {
            Some(ext) => ext.eq_ignore_ascii_case(ALLOWED_EXTENSION),
            None => {
                let essence = content_type
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase();
                ALLOWED_CONTENT_TYPES.contains(&essence.as_str())
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedType {
                filename: filename.to_string(),
                content_type: content_type.to_string(),
            })
        }
    }

    /// Size ceiling is inclusive: exactly `max_bytes` is accepted.
    pub fn check_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_bytes {
            return Err(ValidationError::PayloadTooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

fn extension_of(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}
