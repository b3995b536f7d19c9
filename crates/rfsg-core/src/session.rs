//! Session name resolution.
//!
//! Callers address instruments by session name. The process that owns
//! session lifecycle registers names against driver handles; the call path
//! only ever looks them up, once per call, and never caches the result.

use crate::error::{RfsgError, RfsgResult};
use crate::types::ViSession;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Resolves a caller-supplied session name to a live driver handle.
pub trait SessionRepository: Send + Sync {
    /// Look up the handle registered under `name`.
    ///
    /// Fails with [`RfsgError::SessionNotFound`] if the name is unknown or
    /// the session was closed.
    fn access_session(&self, name: &str) -> RfsgResult<ViSession>;
}

/// Thread-safe in-memory session table.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, ViSession>>,
}

impl InMemorySessionRepository {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `vi` under `name`, returning the handle it replaced.
    pub fn add_session(&self, name: impl Into<String>, vi: ViSession) -> Option<ViSession> {
        self.sessions.write().insert(name.into(), vi)
    }

    /// Forget `name`, returning its handle if it was registered.
    pub fn remove_session(&self, name: &str) -> Option<ViSession> {
        self.sessions.write().remove(name)
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// True if no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ViSession)> for InMemorySessionRepository {
    fn from_iter<I: IntoIterator<Item = (S, ViSession)>>(iter: I) -> Self {
        let sessions = iter.into_iter().map(|(name, vi)| (name.into(), vi)).collect();
        Self {
            sessions: RwLock::new(sessions),
        }
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn access_session(&self, name: &str) -> RfsgResult<ViSession> {
        self.sessions
            .read()
            .get(name)
            .copied()
            .ok_or_else(|| RfsgError::SessionNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_sessions() {
        let repo: InMemorySessionRepository = [("sessA", 7), ("sessB", 9)].into_iter().collect();
        assert_eq!(repo.access_session("sessA").unwrap(), 7);
        assert_eq!(repo.access_session("sessB").unwrap(), 9);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let repo = InMemorySessionRepository::new();
        let err = repo.access_session("sessX").unwrap_err();
        assert!(matches!(err, RfsgError::SessionNotFound(ref name) if name == "sessX"));
    }

    #[test]
    fn removed_session_no_longer_resolves() {
        let repo = InMemorySessionRepository::new();
        assert_eq!(repo.add_session("sessA", 1), None);
        assert_eq!(repo.add_session("sessA", 2), Some(1));
        assert_eq!(repo.remove_session("sessA"), Some(2));
        assert!(repo.access_session("sessA").is_err());
        assert!(repo.is_empty());
    }
}
