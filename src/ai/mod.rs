//! Chat model integration
//!
//! Provides the transport seam to multimodal chat completion APIs used to
//! describe an uploaded scene.

pub mod mime;
pub mod mock;
pub mod openai;

pub use mock::MockChatClient;
pub use openai::OpenAiChatClient;

use crate::Result;
use async_trait::async_trait;
use openai::types::{ChatCompletionRequest, ChatCompletionResponse};

/// One stateless round trip to a chat completion endpoint.
///
/// Implementations carry the credential and transport settings; the full
/// message history travels in every request.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}
