//! The turn orchestrator tying sessions, model calls and rendering together.

use crate::error::CoreError;
use crate::gateway::{ModelGateway, OpenAiCompletion};
use crate::prompt;
use crate::sessions::SessionStore;
use log::{info, warn};
use slidecraft_config::AssistantConfig;
use slidecraft_protocol::{
    Attachment, ChatCompletion, DeckRequest, GENERATE_PRESENTATION, ModelReply, SessionId, Turn,
    generate_presentation_tool,
};
use slidecraft_render::DeckRenderer;
use std::path::PathBuf;
use std::sync::Arc;

/// Conversational presentation assistant.
///
/// Each inbound turn runs to completion: append the user turn, call the
/// model with the full history, dispatch on the reply kind, append and
/// return the assistant turn. Failures downstream of the session store are
/// converted into error-marked replies rather than propagated, so a turn
/// always produces an outbound message.
#[derive(Clone)]
pub struct Assistant {
    sessions: SessionStore,
    gateway: ModelGateway,
    renderer: DeckRenderer,
    system_prompt: String,
    output_root: PathBuf,
}

impl Assistant {
    /// Build an assistant talking to the configured HTTP endpoint.
    pub fn new(config: &AssistantConfig) -> Self {
        let provider = Arc::new(OpenAiCompletion::new(
            config.credentials.clone(),
            config.model.clone(),
            config.temperature,
        ));
        Self::with_provider(config, provider)
    }

    /// Build an assistant with an explicit completion provider.
    pub fn with_provider(config: &AssistantConfig, provider: Arc<dyn ChatCompletion>) -> Self {
        Self {
            sessions: SessionStore::new(),
            gateway: ModelGateway::new(provider),
            renderer: DeckRenderer::new(
                &config.template_path,
                config.title_layout_index,
                config.content_layout_index,
            ),
            system_prompt: config.system_prompt.clone(),
            output_root: config.output_root.clone(),
        }
    }

    /// Open a new conversation and return its session id.
    pub fn create_session(&self) -> SessionId {
        self.sessions.create_session()
    }

    /// Drop a conversation and its history. Returns whether it existed.
    pub fn delete_session(&self, session: SessionId) -> bool {
        self.sessions.delete_session(session)
    }

    /// Snapshot a conversation's history.
    pub fn history(&self, session: SessionId) -> Result<Vec<Turn>, CoreError> {
        self.sessions.history(session)
    }

    /// Process one inbound user turn and return the outbound assistant turn.
    pub async fn handle_turn(
        &self,
        session: SessionId,
        text: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Result<Turn, CoreError> {
        self.sessions
            .append_turn(session, Turn::user(text, attachments))?;

        let history = self.sessions.history(session)?;
        let messages = prompt::assemble_messages(&self.system_prompt, &history);
        let tools = vec![generate_presentation_tool()];
        let reply = self.gateway.request_reply(&messages, &tools).await;

        let outbound = match reply {
            ModelReply::Text { content } => Turn::assistant(content),
            ModelReply::ToolCall {
                name,
                arguments_json,
            } => self.dispatch_tool(session, &name, &arguments_json).await?,
        };

        self.sessions.append_turn(session, outbound.clone())?;
        Ok(outbound)
    }

    /// Dispatch a tool-call reply, rendering the deck on well-formed input.
    async fn dispatch_tool(
        &self,
        session: SessionId,
        name: &str,
        arguments_json: &str,
    ) -> Result<Turn, CoreError> {
        if name != GENERATE_PRESENTATION {
            warn!("model requested unknown tool '{name}'");
            return Ok(Turn::assistant("[ERROR] Invalid function"));
        }
        let request: DeckRequest = match serde_json::from_str(arguments_json) {
            Ok(request) => request,
            Err(err) => {
                warn!("tool arguments failed to decode: {err}");
                return Ok(Turn::assistant(format!(
                    "[ERROR] Problem generating the presentation:\n {err}"
                )));
            }
        };

        let renderer = self.renderer.clone();
        let output_dir = self.output_root.join(session.to_string());
        let rendered = tokio::task::spawn_blocking(move || {
            renderer.render(&request.topic, &request.slide_data, &output_dir)
        })
        .await
        .map_err(|err| CoreError::TaskFailed(err.to_string()))?;

        Ok(match rendered {
            Ok(path) => {
                info!("presentation generated ({})", path.display());
                Turn::assistant_with_file(
                    "[SUCCESS] Your presentation has been generated successfully",
                    Attachment::from_path(path),
                )
            }
            Err(err) => Turn::assistant(format!(
                "[ERROR] Problem generating the presentation:\n {err}"
            )),
        })
    }
}
