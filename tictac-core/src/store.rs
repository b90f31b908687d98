//! Lobby ownership: creation, lookup, eviction, and the public directory

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GameError;
use crate::lobby::Lobby;
use crate::registry::ConnectionId;

/// Identifier of a live lobby: the short token players see and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyId(String);

impl LobbyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LobbyId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for LobbyId {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Token length and alphabet. 36^7 possible ids, so collisions among a
/// handful of live lobbies are vanishingly rare and a retry loop handles
/// the rest.
const TOKEN_LEN: usize = 7;
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_token() -> LobbyId {
    let mut rng = rand::rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();
    LobbyId(token)
}

/// One row of the public lobby directory: seat count only, never boards or
/// connection identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbySummary {
    pub id: LobbyId,
    pub occupancy: usize,
}

/// Owns every live lobby, keyed by id.
///
/// A lobby leaves the store the moment its last player does; an empty lobby
/// is never representable here.
#[derive(Debug, Default)]
pub struct LobbyStore {
    lobbies: HashMap<LobbyId, Lobby>,
}

impl LobbyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new lobby seated with its first player and hand back a
    /// reference to it. Token generation retries until it misses every live
    /// id.
    pub fn create(&mut self, conn: ConnectionId) -> &Lobby {
        let id = loop {
            let candidate = random_token();
            if !self.lobbies.contains_key(&candidate) {
                break candidate;
            }
        };
        debug!(lobby = %id, "lobby created");
        self.lobbies
            .entry(id.clone())
            .or_insert_with(|| Lobby::new(id, conn))
    }

    pub fn get(&self, id: &LobbyId) -> Result<&Lobby, GameError> {
        self.lobbies
            .get(id)
            .ok_or_else(|| GameError::LobbyNotFound(id.clone()))
    }

    pub fn get_mut(&mut self, id: &LobbyId) -> Result<&mut Lobby, GameError> {
        self.lobbies
            .get_mut(id)
            .ok_or_else(|| GameError::LobbyNotFound(id.clone()))
    }

    /// Evict a lobby, returning it.
    pub fn remove(&mut self, id: &LobbyId) -> Result<Lobby, GameError> {
        let lobby = self
            .lobbies
            .remove(id)
            .ok_or_else(|| GameError::LobbyNotFound(id.clone()))?;
        debug!(lobby = %id, "lobby removed");
        Ok(lobby)
    }

    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }

    /// The public lobby directory, sorted by id for stable listings.
    pub fn summaries(&self) -> Vec<LobbySummary> {
        let mut summaries: Vec<LobbySummary> = self
            .lobbies
            .iter()
            .map(|(id, lobby)| LobbySummary {
                id: id.clone(),
                occupancy: lobby.occupancy(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }
}
