//! Session registry traits and types for planning rounds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A participant who joined a session. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Player {
    pub id: String,
    pub name: String,
}

/// Full representation of a session, as returned on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub players: Vec<Player>,
}

/// Read-only projection of a session for viewers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionView {
    pub id: String,
    pub title: String,
    pub players: Vec<Player>,
}

impl From<SessionSnapshot> for SessionView {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            id: snapshot.id,
            title: snapshot.title,
            players: snapshot.players,
        }
    }
}

/// Errors returned by session and registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No session is registered under the given id
    #[error("session not found: {0}")]
    NotFound(String),

    /// Another player in the session already uses this name
    #[error("player with name {0:?} already exists")]
    DuplicateName(String),

    /// The request payload could not be used
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Process-wide registry of live planning sessions.
///
/// Implementations own every session exclusively; callers only ever see
/// owned copies taken under the session's lock.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session with the given title (may be empty).
    async fn create_session(&self, title: &str) -> SessionSnapshot;

    /// Full representation of an existing session.
    async fn get_session(&self, id: &str) -> SessionResult<SessionSnapshot>;

    /// Add a player named `name` to the session `id`.
    async fn join_session(&self, id: &str, name: &str) -> SessionResult<Player>;

    /// Read-only projection listing the session's current players.
    async fn view_session(&self, id: &str) -> SessionResult<SessionView>;

    /// Whether a session is registered under `id`.
    async fn contains_session(&self, id: &str) -> bool;

    /// Number of live sessions.
    async fn session_count(&self) -> usize;

    /// The name of this session store implementation.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_view_drops_created_at() {
        let snapshot = SessionSnapshot {
            id: "s-1".into(),
            title: "Sprint 1".into(),
            created_at: Utc::now(),
            players: vec![Player {
                id: "p-1".into(),
                name: "Big Tuna".into(),
            }],
        };

        let view = SessionView::from(snapshot);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "s-1");
        assert_eq!(json["title"], "Sprint 1");
        assert_eq!(json["players"][0]["name"], "Big Tuna");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn snapshot_serializes_created_at_as_rfc3339() {
        let snapshot = SessionSnapshot {
            id: "s-1".into(),
            title: String::new(),
            created_at: Utc::now(),
            players: Vec::new(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        let created_at = json["created_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created_at).is_ok());
        assert_eq!(json["players"], serde_json::json!([]));
    }

    #[test]
    fn error_messages_name_the_offending_value() {
        assert_eq!(
            SessionError::NotFound("abc".into()).to_string(),
            "session not found: abc"
        );
        assert_eq!(
            SessionError::DuplicateName("Big Tuna".into()).to_string(),
            "player with name \"Big Tuna\" already exists"
        );
    }
}
