//! Session orchestration: one photo in, parsed hotspots out.

use crate::ai::ChatService;
use crate::conversation::{Conversation, Message, RequestConfig, Role};
use crate::models::Hotspot;
use crate::parser::parse_hotspots;
use crate::{prompts, Error, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Builds a fresh [`Conversation`] per image and parses the model's reply.
pub struct HotspotGenerator {
    chat: Arc<dyn ChatService>,
    request: RequestConfig,
}

impl HotspotGenerator {
    pub fn new(chat: Arc<dyn ChatService>, request: RequestConfig) -> Self {
        Self { chat, request }
    }

    pub async fn generate_hotspots(&self, image_path: &Path) -> Result<Vec<Hotspot>> {
        info!("Generating hotspots for {}", image_path.display());

        let mut conversation = Conversation::new(Arc::clone(&self.chat), self.request.clone());
        let message =
            Message::with_image_paths(Role::User, prompts::HOTSPOTS, &[image_path]).await?;
        conversation.speak(message).await?;

        let reply = conversation
            .last_reply()
            .ok_or_else(|| Error::Invariant("Transcript empty after speak".to_string()))?;
        let hotspots = parse_hotspots(reply)?;

        info!("Parsed {} hotspot(s)", hotspots.len());
        Ok(hotspots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::openai::types::ChatMessageContent;
    use crate::ai::MockChatClient;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn write_image(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("scene.png");
        std::fs::write(&path, PNG_HEADER).unwrap();
        path
    }

    fn generator(mock: &MockChatClient) -> HotspotGenerator {
        HotspotGenerator::new(Arc::new(mock.clone()), RequestConfig::default())
    }

    #[tokio::test]
    async fn test_generate_hotspots_parses_reply() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let mock = MockChatClient::new().with_reply(
            "Hotspot 1: Ball\n- Option 1: Roll\n- Option 2: Bounce\nHotspot 2: Chair\n",
        );

        let hotspots = generator(&mock).generate_hotspots(&image).await.unwrap();

        assert_eq!(
            hotspots,
            vec![
                Hotspot {
                    name: "Ball".to_string(),
                    options: vec!["Roll".to_string(), "Bounce".to_string()],
                },
                Hotspot::new("Chair"),
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_hotspots_sends_prompt_and_single_image() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let mock = MockChatClient::new();

        generator(&mock).generate_hotspots(&image).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);

        let message = &requests[0].messages[0];
        assert_eq!(message.role, Role::User);
        let Some(ChatMessageContent::Parts(parts)) = &message.content else {
            panic!("expected multipart content");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text.as_deref(), Some(prompts::HOTSPOTS));
        assert_eq!(
            parts[1].image_url.as_ref().unwrap().url,
            "data:image/png;base64,iVBORw0KGgo="
        );
    }

    #[tokio::test]
    async fn test_missing_image_fails_before_remote_call() {
        let dir = TempDir::new().unwrap();
        let mock = MockChatClient::new();

        let err = generator(&mock)
            .generate_hotspots(&dir.path().join("absent.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::FileAccess { .. }));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let mock = MockChatClient::new().with_failure("service unavailable");

        let err = generator(&mock).generate_hotspots(&image).await.unwrap_err();
        assert!(matches!(err, Error::RemoteCall(ref msg) if msg == "service unavailable"));
    }

    #[tokio::test]
    async fn test_parse_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let mock = MockChatClient::new().with_reply("Hotspot 1:Ball");

        let err = generator(&mock).generate_hotspots(&image).await.unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }
}
