//! Connection identity and connection-to-lobby bindings

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use uuid::Uuid;

use crate::error::GameError;
use crate::store::LobbyId;

/// Opaque identity of one connected client.
///
/// The transport mints one of these per socket; everything downstream keys
/// off it and never sees the socket itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which lobby each live connection currently belongs to.
///
/// The single enforcement point for the one-lobby-per-connection invariant:
/// `bind` refuses a second binding, so callers must `unbind` first.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    bindings: HashMap<ConnectionId, LobbyId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a connection to a lobby. Fails if the connection is already
    /// bound anywhere.
    pub fn bind(&mut self, conn: ConnectionId, lobby: LobbyId) -> Result<(), GameError> {
        match self.bindings.entry(conn) {
            Entry::Occupied(_) => Err(GameError::AlreadyInLobby),
            Entry::Vacant(slot) => {
                slot.insert(lobby);
                Ok(())
            }
        }
    }

    /// Drop a binding, returning the lobby it pointed at. Safe to call for
    /// connections that were never bound.
    pub fn unbind(&mut self, conn: ConnectionId) -> Option<LobbyId> {
        self.bindings.remove(&conn)
    }

    /// The lobby a connection is bound to, if any.
    pub fn lobby_of(&self, conn: ConnectionId) -> Option<&LobbyId> {
        self.bindings.get(&conn)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
