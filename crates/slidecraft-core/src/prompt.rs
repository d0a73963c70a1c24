//! Assembly of stored history into a model message sequence.

use log::debug;
use slidecraft_protocol::{ChatMessage, Role, Turn};

/// Prefix joining a turn's text to its attachment's extracted content.
const AUGMENTATION_PREFIX: &str = ":\nHere is the provided information in the attached document:\n";

/// Build the ordered message sequence for a model call.
///
/// The system instruction always comes first, followed by one role-tagged
/// message per history turn. A user turn carrying attachments has its text
/// augmented with the extracted content of the first attachment, when that
/// attachment has a supported type. Augmentation is recomputed on every
/// assembly, so it stays consistent across calls for an unchanged history.
pub fn assemble_messages(system_prompt: &str, history: &[Turn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::new("system", system_prompt));
    for turn in history {
        let content = match turn.role {
            Role::User => augmented_text(turn),
            Role::Assistant => turn.text.clone(),
        };
        messages.push(ChatMessage::new(turn.role.as_str(), content));
    }
    messages
}

/// Turn text with the first supported attachment's content appended.
///
/// Extraction failures degrade to the unaugmented text: the model still sees
/// the turn, just without the document content.
fn augmented_text(turn: &Turn) -> String {
    let Some(attachment) = turn.attachments.first() else {
        return turn.text.clone();
    };
    let kind = attachment.kind();
    if !kind.is_supported() {
        return turn.text.clone();
    }
    match slidecraft_extract::extract_text(&attachment.path, kind) {
        Ok(extracted) => format!("{}{AUGMENTATION_PREFIX}{extracted}", turn.text),
        Err(err) => {
            debug!("attachment extraction failed ({}): {err}", attachment.name);
            turn.text.clone()
        }
    }
}
