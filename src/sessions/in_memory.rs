//! In-memory session registry implementation.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::session::Session;
use super::traits::{Player, SessionError, SessionResult, SessionSnapshot, SessionStore, SessionView};

/// Default upper bound on a player's display name, in characters.
pub const DEFAULT_MAX_PLAYER_NAME_CHARS: usize = 64;

/// An in-memory registry backed by a lock-protected hash map.
///
/// The outer lock only guards the id → session map. It is released before
/// any session's own lock is taken.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_player_name_chars: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_max_player_name_chars(DEFAULT_MAX_PLAYER_NAME_CHARS)
    }

    pub fn with_max_player_name_chars(max_player_name_chars: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_player_name_chars,
        }
    }

    fn lookup(&self, id: &str) -> SessionResult<Arc<Session>> {
        self.sessions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Trim surrounding whitespace and reject names that are empty or too long.
    fn normalize_name<'a>(&self, name: &'a str) -> SessionResult<&'a str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidInput(
                "player name must not be empty".into(),
            ));
        }
        if name.chars().count() > self.max_player_name_chars {
            return Err(SessionError::InvalidInput(format!(
                "player name must be at most {} characters",
                self.max_player_name_chars
            )));
        }
        Ok(name)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, title: &str) -> SessionSnapshot {
        let session = Arc::new(Session::new(title));
        let snapshot = session.snapshot();

        self.sessions
            .write()
            .insert(session.id().to_string(), session);

        tracing::info!(session = %snapshot.id, title = %snapshot.title, "Session created");
        snapshot
    }

    async fn get_session(&self, id: &str) -> SessionResult<SessionSnapshot> {
        Ok(self.lookup(id)?.snapshot())
    }

    async fn join_session(&self, id: &str, name: &str) -> SessionResult<Player> {
        let session = self.lookup(id)?;
        let name = self.normalize_name(name)?;

        match session.add_player(name) {
            Ok(player) => {
                tracing::info!(session = %id, player = %player.id, name = %player.name, "Player joined");
                Ok(player)
            }
            Err(e) => {
                tracing::warn!(session = %id, error = %e, "Join rejected");
                Err(e)
            }
        }
    }

    async fn view_session(&self, id: &str) -> SessionResult<SessionView> {
        Ok(self.lookup(id)?.view())
    }

    async fn contains_session(&self, id: &str) -> bool {
        self.sessions.read().contains_key(id)
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}
