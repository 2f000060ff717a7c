//! Session management: planning rounds and the players who joined them.

pub mod in_memory;
pub mod session;
pub mod traits;

pub use in_memory::InMemorySessionStore;
pub use session::Session;
pub use traits::{Player, SessionError, SessionResult, SessionSnapshot, SessionStore, SessionView};

use crate::config::SessionsConfig;
use std::sync::Arc;

/// Create the default in-memory session store.
pub fn create_session_store(config: &SessionsConfig) -> Arc<dyn SessionStore> {
    Arc::new(InMemorySessionStore::with_max_player_name_chars(
        config.max_player_name_chars,
    ))
}
