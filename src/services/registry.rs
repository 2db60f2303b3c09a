//! Keyed store of independent alignment sessions.
//!
//! Front ends that serve several users at once (e.g. a web adapter) keep one
//! [`AlignmentSession`] per client here instead of sharing global state.

use std::collections::HashMap;

use crate::session::AlignmentSession;
use crate::types::SessionId;

/// Owns any number of sessions, each addressed by its [`SessionId`].
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, AlignmentSession>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session under a fresh identifier.
    pub fn insert(&mut self, session: AlignmentSession) -> SessionId {
        let id = SessionId::generate();
        self.sessions.insert(id.clone(), session);
        tracing::debug!("Registered session {id}");
        id
    }

    /// Get a session, if it exists.
    pub fn get(&self, id: &SessionId) -> Option<&AlignmentSession> {
        self.sessions.get(id)
    }

    /// Get a session for an intent, if it exists.
    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut AlignmentSession> {
        self.sessions.get_mut(id)
    }

    /// Replace the session under `id` (e.g. restarting with a new song).
    pub fn replace(&mut self, id: &SessionId, session: AlignmentSession) -> Option<AlignmentSession> {
        self.sessions.insert(id.clone(), session)
    }

    /// Drop a session.
    pub fn remove(&mut self, id: &SessionId) -> Option<AlignmentSession> {
        self.sessions.remove(id)
    }

    /// Identifiers of all hosted sessions.
    pub fn ids(&self) -> impl Iterator<Item = &SessionId> {
        self.sessions.keys()
    }

    /// Number of hosted sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are hosted.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::lyrics::LyricDocument;
    use crate::player::ScriptedPlayer;
    use crate::session::{SessionOptions, SessionState};

    fn session(lines: &[&str]) -> AlignmentSession {
        let doc = LyricDocument::build::<_, &str>(lines, None).unwrap();
        AlignmentSession::new(doc, SessionOptions::default())
    }

    #[tokio::test]
    async fn sessions_advance_independently() {
        let player = ScriptedPlayer::new();
        let mut registry = SessionRegistry::new();
        let a = registry.insert(session(&["A", "a1"]));
        let b = registry.insert(session(&["B", "b1"]));
        assert_eq!(registry.len(), 2);

        registry.get_mut(&a).unwrap().advance(&player).await.unwrap();

        assert_eq!(registry.get(&a).unwrap().state(), SessionState::InProgress);
        assert_eq!(registry.get(&b).unwrap().state(), SessionState::NotStarted);
    }

    #[test]
    fn replace_and_remove() {
        let mut registry = SessionRegistry::new();
        let id = registry.insert(session(&["old"]));
        let old = registry.replace(&id, session(&["new", "song"])).unwrap();
        assert_eq!(old.len(), 1);
        assert_eq!(registry.get(&id).unwrap().len(), 2);

        assert!(registry.remove(&id).is_some());
        assert!(registry.is_empty());
        assert_eq!(registry.ids().count(), 0);
    }
}
