use slidecraft_protocol::SessionId;
use thiserror::Error;

/// Errors surfaced by the orchestration layer.
///
/// Model-call and rendering failures are deliberately absent: those are
/// converted into error-marked assistant turns and never propagate here.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced session does not exist or was deleted.
    #[error("unknown session {0}")]
    UnknownSession(SessionId),

    /// A background rendering task panicked or was cancelled.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}
