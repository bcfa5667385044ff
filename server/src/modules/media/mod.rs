//! Thumbnail handling.
//!
//! Thumbnails arrive as a `{name, base64}` JSON envelope and are written
//! through a pluggable blob store; entries keep only the relative path.

use std::fs;
use std::path::PathBuf;

use base64::Engine;
use serde::Deserialize;

use crate::modules::error::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailPayload {
    pub name: String,
    pub base64: String,
}

/// Where decoded thumbnail bytes end up. Filesystem in development,
/// object storage behind the same trait in production.
pub trait ThumbnailStore: Send + Sync {
    /// Store the bytes and return the relative path to record.
    fn store(&self, name: &str, data: &[u8]) -> Result<String, ServiceError>;
}

pub struct FsThumbnailStore {
    root: PathBuf,
}

impl FsThumbnailStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ThumbnailStore for FsThumbnailStore {
    fn store(&self, name: &str, data: &[u8]) -> Result<String, ServiceError> {
        // Uploaded names are untrusted; keep only the final component.
        let safe_name = name.rsplit(['/', '\\']).next().unwrap_or("thumbnail");
        let relative = format!("images/entries/{}-{}", uuid::Uuid::new_v4(), safe_name);
        let full = self.root.join(&relative);

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| ServiceError::Media(e.to_string()))?;
        }
        fs::write(&full, data).map_err(|e| ServiceError::Media(e.to_string()))?;

        Ok(relative)
    }
}

/// Decode the JSON thumbnail envelope into (file name, bytes).
pub fn decode_payload(payload: &ThumbnailPayload) -> Result<(String, Vec<u8>), ServiceError> {
    if payload.name.trim().is_empty() {
        return Err(ServiceError::invalid("thumbnail", "file name is required"));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.base64.as_bytes())
        .map_err(|_| ServiceError::invalid("thumbnail", "invalid base64 image data"))?;

    Ok((payload.name.clone(), bytes))
}
