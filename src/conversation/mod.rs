//! Multi-turn conversation state
//!
//! A [`Conversation`] keeps an append-only transcript and resends the whole
//! history on every turn, since the chat API itself is stateless.

pub mod message;

pub use message::{ImageAttachment, Message, Role};

use crate::ai::openai::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessageContent};
use crate::ai::ChatService;
use crate::{Error, Result};
use std::sync::Arc;

/// Model parameters sent with every request of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 500,
        }
    }
}

impl RequestConfig {
    fn render<'a>(&self, messages: impl Iterator<Item = &'a Message>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: messages.map(Message::to_wire).collect(),
        }
    }
}

pub struct Conversation {
    chat: Arc<dyn ChatService>,
    request: RequestConfig,
    transcript: Vec<Message>,
}

impl Conversation {
    pub fn new(chat: Arc<dyn ChatService>, request: RequestConfig) -> Self {
        Self {
            chat,
            request,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn request(&self) -> &RequestConfig {
        &self.request
    }

    pub fn reconfigure(&mut self, request: RequestConfig) {
        self.request = request;
    }

    /// Text of the most recent transcript entry.
    pub fn last_reply(&self) -> Option<&str> {
        self.transcript.last().map(Message::text)
    }

    /// Send `message` together with the full history and record the reply.
    ///
    /// The transcript only changes when the remote call succeeds, in which case
    /// it grows by exactly two entries: `message`, then the reply.
    pub async fn speak(&mut self, message: Message) -> Result<String> {
        let request = self
            .request
            .render(self.transcript.iter().chain(std::iter::once(&message)));

        let response = self.chat.chat_completion(&request).await?;
        let reply = Self::reply_from_response(response)?;

        tracing::debug!("Model reply ({} chars):\n{}", reply.text().len(), reply.text());

        let text = reply.text().to_string();
        self.transcript.push(message);
        self.transcript.push(reply);
        Ok(text)
    }

    /// Branch this conversation: same settings, independent transcript snapshot.
    pub fn copy(&self) -> Self {
        Self {
            chat: Arc::clone(&self.chat),
            request: self.request.clone(),
            transcript: self.transcript.clone(),
        }
    }

    fn reply_from_response(response: ChatCompletionResponse) -> Result<Message> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::RemoteCall("No choices in chat response".to_string()))?;

        let text = match choice.message.content {
            Some(ChatMessageContent::Text(text)) => text,
            Some(ChatMessageContent::Parts(parts)) => parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("\n"),
            None => {
                return Err(Error::RemoteCall(
                    "Chat response message has no content".to_string(),
                ))
            }
        };

        Ok(Message::new(choice.message.role, text))
    }
}
