//! Chat-completion transport and the in-band error boundary around it.

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Value, json};
use slidecraft_config::ApiCredentials;
use slidecraft_protocol::{ChatCompletion, ChatMessage, GatewayError, ModelReply};
use std::sync::Arc;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Chat-completion provider backed by an OpenAI-compatible HTTP endpoint.
///
/// Supports both the direct endpoint (bearer auth) and Azure-hosted
/// deployments (`api-key` header, deployment name in the URL path).
#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    client: reqwest::Client,
    credentials: ApiCredentials,
    model: String,
    temperature: f32,
}

impl OpenAiCompletion {
    pub fn new(credentials: ApiCredentials, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            model: model.into(),
            temperature,
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiCompletion {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[Value],
    ) -> Result<ModelReply, GatewayError> {
        let mut body = json!({
            "messages": messages,
            "temperature": self.temperature,
            "tools": tools,
            "tool_choice": "auto",
        });

        let request = match &self.credentials {
            ApiCredentials::OpenAi { api_key } => {
                body["model"] = json!(self.model);
                self.client.post(OPENAI_CHAT_URL).bearer_auth(api_key)
            }
            ApiCredentials::Azure {
                api_key,
                endpoint,
                api_version,
            } => {
                // Azure routes by deployment name, not a model field.
                let url = format!(
                    "{}/openai/deployments/{}/chat/completions",
                    endpoint.trim_end_matches('/'),
                    self.model
                );
                self.client
                    .post(url)
                    .query(&[("api-version", api_version)])
                    .header("api-key", api_key)
            }
        };

        debug!("issuing completion (model={}, messages={})", self.model, messages.len());
        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))?;
        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            GatewayError::InvalidResponse("response carried no choices".to_string())
        })?;
        reply_from_message(choice.message)
    }
}

/// Map a response message to a reply.
///
/// A tool call takes precedence over text content, and only the first tool
/// invocation is honored when several come back.
fn reply_from_message(message: ResponseMessage) -> Result<ModelReply, GatewayError> {
    if let Some(call) = message.tool_calls.into_iter().next() {
        return Ok(ModelReply::ToolCall {
            name: call.function.name,
            arguments_json: call.function.arguments,
        });
    }
    match message.content {
        Some(content) => Ok(ModelReply::Text { content }),
        None => Err(GatewayError::InvalidResponse(
            "response carried neither content nor a tool call".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCallEntry>,
}

#[derive(Debug, Deserialize)]
struct ToolCallEntry {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

/// Error boundary around a completion provider.
///
/// Every provider failure becomes an error-marked text reply; nothing raised
/// by the transport escapes past this point.
#[derive(Clone)]
pub struct ModelGateway {
    provider: Arc<dyn ChatCompletion>,
}

impl ModelGateway {
    pub fn new(provider: Arc<dyn ChatCompletion>) -> Self {
        Self { provider }
    }

    /// Request a reply, converting any failure into an in-band error text.
    pub async fn request_reply(&self, messages: &[ChatMessage], tools: &[Value]) -> ModelReply {
        match self.provider.complete(messages, tools).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("model call failed: {err}");
                ModelReply::Text {
                    content: format!("[ERROR] Problem calling the model API:\n {err}"),
                }
            }
        }
    }
}
