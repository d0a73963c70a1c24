//! Chat-completion seam between the orchestration core and model providers.

use crate::{ChatMessage, ModelReply};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a chat-completion provider.
///
/// These never propagate past the model gateway: the gateway converts every
/// variant into an in-band error reply.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure reaching the endpoint.
    #[error("transport error: {0}")]
    Transport(String),
    /// The endpoint answered with a non-success status.
    #[error("api error {status}: {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or failure detail.
        detail: String,
    },
    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The response carried neither text content nor a tool call.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// One synchronous chat-completion call against a model endpoint.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the assembled messages plus tool declarations; return either a
    /// natural-language reply or the first tool invocation the model elected.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[Value],
    ) -> Result<ModelReply, GatewayError>;
}
