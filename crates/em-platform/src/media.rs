//! Uploaded image storage

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PlatformError, Result};

pub const AVATARS_DIR: &str = "images/avatars";
pub const EVENTS_DIR: &str = "images/events";

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Lowercased extension of `filename`, if it is an accepted image type
fn image_extension(filename: &str) -> Option<String> {
    let extension = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// Relative storage path for an uploaded image: `{dir}/{kind}-{uuid}.{ext}`
pub fn image_file_path(kind: &str, filename: &str, dir: &str) -> Result<String> {
    let extension = image_extension(filename).ok_or_else(|| {
        PlatformError::invalid_field(
            "image",
            format!(
                "Unsupported image type. Allowed extensions: {}.",
                ALLOWED_EXTENSIONS.join(", ")
            ),
        )
    })?;
    Ok(format!("{}/{}-{}.{}", dir, kind, uuid::Uuid::new_v4(), extension))
}

/// Writes images beneath a root directory
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store `bytes` under a generated name and return the relative path
    pub async fn save_image(&self, kind: &str, filename: &str, dir: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(PlatformError::invalid_field("image", "The submitted file is empty."));
        }
        let relative = image_file_path(kind, filename, dir)?;
        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        debug!(path = %relative, size = bytes.len(), "Stored image");
        Ok(relative)
    }

    /// Best-effort removal of a previously stored image
    pub async fn remove(&self, relative: &str) {
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            debug!(path = %relative, error = %e, "Could not remove old image");
        }
    }
}
