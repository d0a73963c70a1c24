//! In-memory per-session conversation histories.

use crate::error::CoreError;
use log::{debug, info};
use parking_lot::RwLock;
use slidecraft_protocol::{SessionId, Turn};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Thread-safe store of session histories.
///
/// Histories are append-only for the lifetime of a session and are dropped
/// wholesale on deletion. Cloning the store shares the underlying map, so a
/// single store can serve concurrent sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, Vec<Turn>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session with an empty history and return its id.
    pub fn create_session(&self) -> SessionId {
        let session = Uuid::new_v4();
        self.inner.write().insert(session, Vec::new());
        info!("session created ({session})");
        session
    }

    /// Append a turn to a session's history.
    pub fn append_turn(&self, session: SessionId, turn: Turn) -> Result<(), CoreError> {
        let mut sessions = self.inner.write();
        let history = sessions
            .get_mut(&session)
            .ok_or(CoreError::UnknownSession(session))?;
        history.push(turn);
        debug!("turn appended (session={session}, turns={})", history.len());
        Ok(())
    }

    /// Snapshot a session's history in append order.
    pub fn history(&self, session: SessionId) -> Result<Vec<Turn>, CoreError> {
        self.inner
            .read()
            .get(&session)
            .cloned()
            .ok_or(CoreError::UnknownSession(session))
    }

    /// Remove a session and its history. Returns whether it existed.
    pub fn delete_session(&self, session: SessionId) -> bool {
        let existed = self.inner.write().remove(&session).is_some();
        if existed {
            info!("session deleted ({session})");
        }
        existed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slidecraft_protocol::Role;

    #[test]
    fn histories_preserve_append_order() {
        let store = SessionStore::new();
        let session = store.create_session();
        store
            .append_turn(session, Turn::user("first", Vec::new()))
            .expect("append");
        store
            .append_turn(session, Turn::assistant("second"))
            .expect("append");

        let history = store.history(session).expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].text, "first");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].text, "second");
    }

    #[test]
    fn unknown_sessions_are_rejected() {
        let store = SessionStore::new();
        let missing = Uuid::new_v4();
        assert_eq!(
            matches!(
                store.append_turn(missing, Turn::assistant("x")),
                Err(CoreError::UnknownSession(_))
            ),
            true
        );
        assert_eq!(store.history(missing).is_err(), true);
    }

    #[test]
    fn deleting_a_session_drops_its_history() {
        let store = SessionStore::new();
        let session = store.create_session();
        assert_eq!(store.delete_session(session), true);
        assert_eq!(store.delete_session(session), false);
        assert_eq!(store.history(session).is_err(), true);
    }

    #[test]
    fn sessions_do_not_share_history() {
        let store = SessionStore::new();
        let first = store.create_session();
        let second = store.create_session();
        store
            .append_turn(first, Turn::user("only in first", Vec::new()))
            .expect("append");

        assert_eq!(store.history(first).expect("history").len(), 1);
        assert_eq!(store.history(second).expect("history").len(), 0);
    }
}
