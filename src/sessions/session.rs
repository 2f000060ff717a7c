//! A single planning round and its joined players.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::traits::{Player, SessionError, SessionResult, SessionSnapshot, SessionView};

/// One planning session. The player map is append-only and guarded by its
/// own lock, independent of the registry that owns the session.
#[derive(Debug)]
pub struct Session {
    id: String,
    title: String,
    created_at: DateTime<Utc>,
    players: RwLock<HashMap<String, Player>>,
}

impl Session {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: Utc::now(),
            players: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Add a player, failing with `DuplicateName` if the exact name is taken.
    ///
    /// The duplicate scan and the insert happen under one write guard, so two
    /// concurrent joins with the same name cannot both succeed.
    pub fn add_player(&self, name: &str) -> SessionResult<Player> {
        let mut players = self.players.write();

        if players.values().any(|p| p.name == name) {
            return Err(SessionError::DuplicateName(name.to_string()));
        }

        let player = Player {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        players.insert(player.id.clone(), player.clone());
        Ok(player)
    }

    /// Snapshot of the current players, ordered by name.
    pub fn list_players(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self.players.read().values().cloned().collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        players
    }

    pub fn player_count(&self) -> usize {
        self.players.read().len()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            players: self.list_players(),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id.clone(),
            title: self.title.clone(),
            players: self.list_players(),
        }
    }
}
