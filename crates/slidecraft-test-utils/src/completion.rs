//! Mock chat-completion providers.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use slidecraft_protocol::{ChatCompletion, ChatMessage, GatewayError, ModelReply};
use std::sync::Arc;

/// Completion provider returning the same canned reply on every call.
#[derive(Debug, Clone)]
pub struct FixedCompletion {
    reply: ModelReply,
}

impl FixedCompletion {
    /// Always answer with plain text.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            reply: ModelReply::Text {
                content: content.into(),
            },
        }
    }

    /// Always answer with a tool call.
    pub fn tool_call(name: impl Into<String>, arguments_json: impl Into<String>) -> Self {
        Self {
            reply: ModelReply::ToolCall {
                name: name.into(),
                arguments_json: arguments_json.into(),
            },
        }
    }
}

#[async_trait]
impl ChatCompletion for FixedCompletion {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[Value],
    ) -> Result<ModelReply, GatewayError> {
        Ok(self.reply.clone())
    }
}

/// Completion provider that always fails at the transport level.
#[derive(Debug, Clone)]
pub struct FailingCompletion {
    message: String,
}

impl FailingCompletion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChatCompletion for FailingCompletion {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[Value],
    ) -> Result<ModelReply, GatewayError> {
        Err(GatewayError::Transport(self.message.clone()))
    }
}

/// Completion provider capturing the message sequence of the latest call.
#[derive(Debug, Clone)]
pub struct RecordingCompletion {
    reply: ModelReply,
    /// Messages passed to the most recent `complete` call.
    pub last_messages: Arc<Mutex<Vec<ChatMessage>>>,
    /// Tool declarations passed to the most recent `complete` call.
    pub last_tools: Arc<Mutex<Vec<Value>>>,
}

impl RecordingCompletion {
    pub fn new(reply: ModelReply) -> Self {
        Self {
            reply,
            last_messages: Arc::new(Mutex::new(Vec::new())),
            last_tools: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record and answer with plain text.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ModelReply::Text {
            content: content.into(),
        })
    }
}

#[async_trait]
impl ChatCompletion for RecordingCompletion {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[Value],
    ) -> Result<ModelReply, GatewayError> {
        *self.last_messages.lock() = messages.to_vec();
        *self.last_tools.lock() = tools.to_vec();
        Ok(self.reply.clone())
    }
}
