//! Image ingress for uploaded scene photos
//!
//! Decodes base64 uploads (optionally data-URL prefixed) and normalizes them to
//! PNG scratch files so the conversation can attach them. A scratch file lives
//! exactly as long as the returned [`TempPath`], including when the request
//! holding it is cancelled.

pub mod upload;

pub use upload::UploadStore;

use crate::Result;
use async_trait::async_trait;
use tempfile::TempPath;

#[async_trait]
pub trait UploadService: Send + Sync {
    /// Decode and persist an upload. The file is removed when the handle drops.
    async fn save_upload(&self, payload: &str) -> Result<TempPath>;
}
