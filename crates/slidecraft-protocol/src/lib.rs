//! Wire and data types shared across the Slidecraft crates.

mod completion;
mod tool;

pub use completion::{ChatCompletion, GatewayError};
pub use tool::{GENERATE_PRESENTATION, generate_presentation_tool};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Speaker role for a turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored turn.
    User,
    /// Assistant-authored turn.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One inbound or outbound message in a conversation.
///
/// Turns are append-only: once stored in a session history they are never
/// edited, only replayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    /// Role that produced the turn.
    pub role: Role,
    /// Text content, possibly empty.
    pub text: String,
    /// Attached file references; only the first is consulted for augmentation.
    pub attachments: Vec<Attachment>,
    /// Timestamp for the turn.
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Build a user turn carrying optional attachments.
    pub fn user(text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            attachments,
            created_at: Utc::now(),
        }
    }

    /// Build a plain assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Build an assistant turn carrying a generated file.
    pub fn assistant_with_file(text: impl Into<String>, file: Attachment) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            attachments: vec![file],
            created_at: Utc::now(),
        }
    }
}

/// Reference to a file accompanying a turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    /// Original file name; its extension drives type dispatch.
    pub name: String,
    /// Resolved local path for the file content.
    pub path: PathBuf,
}

impl Attachment {
    /// Build an attachment from a local path, using its file name as the name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    /// Classify the attachment by the extension of its original name.
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_name(&self.name)
    }
}

/// Supported attachment document types, dispatched on file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Plain text (`.txt` / `.text`), read verbatim.
    Text,
    /// Word-processor document (`.docx`).
    Docx,
    /// PDF document (`.pdf`).
    Pdf,
    /// Anything else; extracts to an empty string.
    Unsupported,
}

impl AttachmentKind {
    /// Classify a file name by its extension, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "txt" | "text" => AttachmentKind::Text,
            "docx" => AttachmentKind::Docx,
            "pdf" => AttachmentKind::Pdf,
            _ => AttachmentKind::Unsupported,
        }
    }

    /// Whether text extraction is available for this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, AttachmentKind::Unsupported)
    }
}

/// Role-tagged message as sent to the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Message role: "system", "user" or "assistant".
    pub role: String,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Build a message with the given role tag.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Discriminated result of one model call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type", content = "payload")]
pub enum ModelReply {
    /// Natural-language assistant reply.
    Text {
        /// Reply content.
        content: String,
    },
    /// Structured tool invocation elected by the model.
    ToolCall {
        /// Tool name as returned by the model.
        name: String,
        /// Raw JSON argument payload, decoded by the orchestrator.
        arguments_json: String,
    },
}

/// One slide's worth of content from the model's tool-call arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlideRecord {
    /// Slide title; the layout default is kept when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Bullet strings for the slide body, joined with newlines when rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
}

/// Decoded `generate_presentation` tool-call arguments.
///
/// Both fields are required; a payload missing either fails to decode and the
/// turn surfaces an error instead of a partial render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeckRequest {
    /// Topic of the presentation, used for the title slide.
    pub topic: String,
    /// Ordered slide contents.
    pub slide_data: Vec<SlideRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attachment_kind_dispatches_on_extension() {
        assert_eq!(AttachmentKind::from_name("notes.txt"), AttachmentKind::Text);
        assert_eq!(
            AttachmentKind::from_name("notes.TEXT"),
            AttachmentKind::Text
        );
        assert_eq!(
            AttachmentKind::from_name("report.docx"),
            AttachmentKind::Docx
        );
        assert_eq!(AttachmentKind::from_name("deck.PDF"), AttachmentKind::Pdf);
        assert_eq!(
            AttachmentKind::from_name("image.png"),
            AttachmentKind::Unsupported
        );
        assert_eq!(
            AttachmentKind::from_name("no_extension"),
            AttachmentKind::Unsupported
        );
    }

    #[test]
    fn deck_request_requires_both_fields() {
        let full: DeckRequest = serde_json::from_str(
            r#"{"topic":"Solar","slide_data":[{"title":"Intro","content":["Clean energy"]}]}"#,
        )
        .expect("decode");
        assert_eq!(full.topic, "Solar");
        assert_eq!(full.slide_data.len(), 1);

        let missing_topic: Result<DeckRequest, _> =
            serde_json::from_str(r#"{"slide_data":[]}"#);
        assert_eq!(missing_topic.is_err(), true);

        let missing_slides: Result<DeckRequest, _> =
            serde_json::from_str(r#"{"topic":"Solar"}"#);
        assert_eq!(missing_slides.is_err(), true);
    }

    #[test]
    fn slide_record_fields_are_optional() {
        let record: SlideRecord = serde_json::from_str("{}").expect("decode");
        assert_eq!(record.title, None);
        assert_eq!(record.content, None);
    }

    #[test]
    fn model_reply_round_trips_through_json() {
        let reply = ModelReply::ToolCall {
            name: GENERATE_PRESENTATION.to_string(),
            arguments_json: r#"{"topic":"x","slide_data":[]}"#.to_string(),
        };
        let encoded = serde_json::to_value(&reply).expect("serialize");
        let decoded: ModelReply = serde_json::from_value(encoded).expect("deserialize");
        assert_eq!(decoded, reply);
    }
}
