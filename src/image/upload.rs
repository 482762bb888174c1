use super::UploadService;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use uuid::Uuid;

/// Writes uploads as PNG files under a scratch directory.
pub struct UploadStore {
    upload_dir: PathBuf,
}

impl UploadStore {
    pub fn new(upload_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(upload_dir)?;
        Ok(Self {
            upload_dir: upload_dir.to_path_buf(),
        })
    }

    /// Strip an optional `data:<mime>;base64,` prefix and decode the rest.
    pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
        let trimmed = payload.trim();
        let encoded = match trimmed.strip_prefix("data:") {
            Some(rest) => rest
                .split_once(";base64,")
                .map(|(_, data)| data)
                .ok_or_else(|| Error::Decode("Data URL is not base64 encoded".to_string()))?,
            None => trimmed,
        };

        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| Error::Decode(format!("Invalid base64 image data: {}", e)))
    }

    fn save_png_sync(image: DynamicImage, path: TempPath) -> Result<TempPath> {
        image.save_with_format(&path, ImageFormat::Png)?;
        Ok(path)
    }

    /// Encode on a blocking task that owns the scratch handle, so the file is
    /// still cleaned up if the caller goes away mid-save.
    async fn save_png(&self, image: DynamicImage, path: TempPath) -> Result<TempPath> {
        tokio::task::spawn_blocking(move || Self::save_png_sync(image, path))
            .await
            .map_err(|e| Error::Invariant(format!("Image save task join error: {}", e)))?
    }
}

#[async_trait]
impl UploadService for UploadStore {
    async fn save_upload(&self, payload: &str) -> Result<TempPath> {
        let bytes = Self::decode_payload(payload)?;
        let img = image::load_from_memory(&bytes)?;

        let path = TempPath::from_path(
            self.upload_dir
                .join(format!("user-image-{}.png", Uuid::new_v4())),
        );
        let path = self.save_png(img, path).await?;

        tracing::debug!("Saved upload ({} bytes) to {}", bytes.len(), path.display());
        Ok(path)
    }
}
