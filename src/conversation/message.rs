use crate::ai::mime::{detect_image_mime, FALLBACK_IMAGE_MIME};
use crate::ai::openai::types::{ChatMessage, ChatMessageContent, MessagePart};
use crate::{Error, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Base64-encoded image payload with the MIME type sniffed from its bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    mime: &'static str,
    encoded: String,
}

impl ImageAttachment {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            mime: detect_image_mime(bytes).unwrap_or(FALLBACK_IMAGE_MIME),
            encoded: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.encoded)
    }
}

/// A single conversational turn.
///
/// Messages are immutable once built; attachments keep the order they were
/// supplied in.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    role: Role,
    text: String,
    images: Vec<ImageAttachment>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn with_images(role: Role, text: impl Into<String>, images: Vec<ImageAttachment>) -> Self {
        Self {
            role,
            text: text.into(),
            images,
        }
    }

    /// Build a message whose images are read from disk, each path exactly once.
    ///
    /// Fails with [`Error::FileAccess`] on the first unreadable path.
    pub async fn with_image_paths<P: AsRef<Path>>(
        role: Role,
        text: impl Into<String>,
        paths: &[P],
    ) -> Result<Self> {
        let mut images = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| Error::FileAccess {
                    path: path.to_path_buf(),
                    source,
                })?;
            if detect_image_mime(&bytes).is_none() {
                tracing::warn!(
                    "{} is not a recognized image format, attaching as {}",
                    path.display(),
                    FALLBACK_IMAGE_MIME
                );
            }
            tracing::debug!("Attached {} ({} bytes)", path.display(), bytes.len());
            images.push(ImageAttachment::from_bytes(&bytes));
        }

        Ok(Self::with_images(role, text, images))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn images(&self) -> &[ImageAttachment] {
        &self.images
    }

    /// Render as chat content parts: the text first, then one part per image.
    pub fn to_wire(&self) -> ChatMessage {
        let parts = std::iter::once(MessagePart::text(self.text.clone()))
            .chain(
                self.images
                    .iter()
                    .map(|image| MessagePart::image_url(image.data_url())),
            )
            .collect();

        ChatMessage {
            role: self.role,
            content: Some(ChatMessageContent::Parts(parts)),
        }
    }
}
