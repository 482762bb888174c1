use super::openai::types::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageContent,
};
use super::ChatService;
use crate::conversation::Role;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const DEFAULT_REPLY: &str = "Hotspot 1: Toy\n- Option 1: Play\n- Option 2: More";

enum MockReply {
    Response(ChatCompletionResponse),
    Failure(String),
}

/// In-memory chat transport that replays queued replies in order.
///
/// Clones share state, so a probe kept by a test observes calls made through
/// the copy handed to the code under test.
#[derive(Clone)]
pub struct MockChatClient {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        let response = Self::text_response(Role::Assistant, text.into());
        self.push(MockReply::Response(response))
    }

    pub fn with_response(self, response: ChatCompletionResponse) -> Self {
        self.push(MockReply::Response(response))
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Failure(message.into()))
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    fn text_response(role: Role, text: String) -> ChatCompletionResponse {
        ChatCompletionResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role,
                    content: Some(ChatMessageContent::Text(text)),
                },
                finish_reason: Some("stop".to_string()),
            }],
        }
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Failure(message)) => Err(Error::RemoteCall(message)),
            None => Ok(Self::text_response(
                Role::Assistant,
                DEFAULT_REPLY.to_string(),
            )),
        }
    }
}
