//! Shared application state for the tictac server

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::dispatch::GameDispatcher;
use crate::router::Broadcaster;

/// Shared state accessible by all handlers
pub struct AppState {
    /// Authoritative game state. One inbound message is handled to
    /// completion under this lock, which is what serializes cross-connection
    /// interactions.
    pub dispatcher: Mutex<GameDispatcher>,
    /// Outbound queues for every open socket
    pub broadcaster: Broadcaster,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            dispatcher: Mutex::new(GameDispatcher::new()),
            broadcaster: Broadcaster::new(),
            started_at: Utc::now(),
        }
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// Number of live lobbies
    pub async fn lobby_count(&self) -> usize {
        self.dispatcher.lock().await.lobby_count()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
