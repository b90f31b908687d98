//! Inbound message dispatch against the authoritative game state
//!
//! `GameDispatcher` owns the lobby store and the connection registry. The
//! server holds it behind one mutex and feeds it one decoded message at a
//! time, so every handler runs to completion before the next begins, the
//! same serialization a single dispatch loop would give. Handlers return the
//! complete delivery set and never touch sockets themselves; recipients are
//! always resolved from lobby membership, never from the global connection
//! set.

use tictac_core::{
    ConnectionId, ConnectionRegistry, Lobby, LobbyId, LobbyStore, LobbySummary, Mark,
};
use tracing::{debug, warn};

use crate::ws::protocol::{ClientMessage, PlayerInfo, ServerMessage};

/// One outbound message, addressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub to: ConnectionId,
    pub message: ServerMessage,
}

fn direct(to: ConnectionId, message: ServerMessage) -> Delivery {
    Delivery { to, message }
}

fn lobby_not_found() -> ServerMessage {
    ServerMessage::LobbyNotFound {
        message: "lobby not found".to_string(),
    }
}

fn lobby_full() -> ServerMessage {
    ServerMessage::LobbyFull {
        message: "lobby is already full".to_string(),
    }
}

fn already_in_lobby() -> ServerMessage {
    ServerMessage::AlreadyInLobby {
        message: "you are already in a lobby".to_string(),
    }
}

fn player_infos(lobby: &Lobby) -> Vec<PlayerInfo> {
    lobby
        .players()
        .iter()
        .map(|player| PlayerInfo {
            mark: player.mark(),
        })
        .collect()
}

/// The authoritative coordination state: every live lobby plus the
/// connection-to-lobby bindings.
#[derive(Debug, Default)]
pub struct GameDispatcher {
    store: LobbyStore,
    registry: ConnectionRegistry,
}

impl GameDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live lobbies, for health reporting.
    pub fn lobby_count(&self) -> usize {
        self.store.len()
    }

    /// The public lobby directory.
    pub fn summaries(&self) -> Vec<LobbySummary> {
        self.store.summaries()
    }

    /// Handle one decoded message from `from`, returning every delivery it
    /// produced.
    pub fn handle_message(&mut self, from: ConnectionId, message: ClientMessage) -> Vec<Delivery> {
        match message {
            ClientMessage::CreateLobby => self.create_lobby(from),
            ClientMessage::JoinLobby { lobby_id } => self.join_lobby(from, lobby_id),
            ClientMessage::MakeMove { row, col, mark } => self.make_move(from, row, col, mark),
            ClientMessage::RestartGame => self.restart_game(from),
            ClientMessage::LeaveLobby => self.remove_from_lobby(from, true),
            ClientMessage::GetLobbies => self.get_lobbies(from),
        }
    }

    /// Transport-level close: same as LEAVE_LOBBY, minus the replies to a
    /// connection that no longer exists. Idempotent, so a close racing a
    /// leave resolves to a single removal.
    pub fn handle_disconnect(&mut self, conn: ConnectionId) -> Vec<Delivery> {
        self.remove_from_lobby(conn, false)
    }

    fn create_lobby(&mut self, from: ConnectionId) -> Vec<Delivery> {
        if self.registry.lobby_of(from).is_some() {
            return vec![direct(from, already_in_lobby())];
        }

        let lobby = self.store.create(from);
        let id = lobby.id().clone();
        let message = ServerMessage::LobbyCreated {
            lobby_id: id.clone(),
            players: player_infos(lobby),
            board: lobby.board(),
            next_move: lobby.next_move(),
        };

        if let Err(err) = self.registry.bind(from, id) {
            // Unreachable: checked above, and the connection holds no other
            // binding until this handler returns.
            warn!(%from, %err, "bind failed for freshly created lobby");
        }
        vec![direct(from, message)]
    }

    fn join_lobby(&mut self, from: ConnectionId, lobby_id: LobbyId) -> Vec<Delivery> {
        if self.registry.lobby_of(from).is_some() {
            return vec![direct(from, already_in_lobby())];
        }
        let Ok(lobby) = self.store.get_mut(&lobby_id) else {
            return vec![direct(from, lobby_not_found())];
        };
        let mark = match lobby.join(from) {
            Ok(mark) => mark,
            Err(_) => return vec![direct(from, lobby_full())],
        };

        let others: Vec<ConnectionId> = lobby
            .members()
            .into_iter()
            .filter(|member| *member != from)
            .collect();
        let joined = ServerMessage::JoinedLobby {
            lobby_id: lobby_id.clone(),
            players: player_infos(lobby),
            board: lobby.board(),
            next_move: lobby.next_move(),
            mark,
        };
        let seated = ServerMessage::PlayerJoined {
            lobby_id: lobby_id.clone(),
            players: player_infos(lobby),
        };

        if let Err(err) = self.registry.bind(from, lobby_id) {
            warn!(%from, %err, "bind failed after join");
        }

        let mut deliveries = vec![direct(from, joined)];
        deliveries.extend(others.into_iter().map(|to| Delivery {
            to,
            message: seated.clone(),
        }));
        deliveries
    }

    fn make_move(
        &mut self,
        from: ConnectionId,
        row: usize,
        col: usize,
        mark: Mark,
    ) -> Vec<Delivery> {
        let Some(lobby_id) = self.registry.lobby_of(from).cloned() else {
            return vec![direct(from, lobby_not_found())];
        };
        let Ok(lobby) = self.store.get_mut(&lobby_id) else {
            warn!(%from, lobby = %lobby_id, "dropping stale binding");
            self.registry.unbind(from);
            return vec![direct(from, lobby_not_found())];
        };

        let outcome = match lobby.play(mark, row, col) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(%from, lobby = %lobby_id, %err, "move rejected");
                return vec![direct(
                    from,
                    ServerMessage::MoveRejected {
                        lobby_id,
                        reason: err.into(),
                    },
                )];
            }
        };

        let members = lobby.members();
        let moved = ServerMessage::MoveMade {
            lobby_id: lobby_id.clone(),
            board: lobby.board(),
            next_move: lobby.next_move(),
        };
        let mut deliveries: Vec<Delivery> = members
            .iter()
            .map(|&to| Delivery {
                to,
                message: moved.clone(),
            })
            .collect();

        if outcome.is_terminal() {
            let over = ServerMessage::GameOver {
                lobby_id,
                winner: outcome.winner(),
                outcome: outcome.kind(),
            };
            deliveries.extend(members.iter().map(|&to| Delivery {
                to,
                message: over.clone(),
            }));
        }
        deliveries
    }

    fn restart_game(&mut self, from: ConnectionId) -> Vec<Delivery> {
        let Some(lobby_id) = self.registry.lobby_of(from).cloned() else {
            return vec![direct(from, lobby_not_found())];
        };
        let Ok(lobby) = self.store.get_mut(&lobby_id) else {
            warn!(%from, lobby = %lobby_id, "dropping stale binding");
            self.registry.unbind(from);
            return vec![direct(from, lobby_not_found())];
        };

        lobby.restart();

        let restarted = ServerMessage::LobbyRestarted {
            lobby_id,
            board: lobby.board(),
            next_move: lobby.next_move(),
        };
        lobby
            .members()
            .into_iter()
            .map(|to| Delivery {
                to,
                message: restarted.clone(),
            })
            .collect()
    }

    /// Unseat `conn` from its lobby, evicting the lobby if it empties.
    /// `reply` is false on transport close, where there is nobody to answer.
    fn remove_from_lobby(&mut self, conn: ConnectionId, reply: bool) -> Vec<Delivery> {
        let Some(lobby_id) = self.registry.unbind(conn) else {
            return if reply {
                vec![direct(conn, lobby_not_found())]
            } else {
                Vec::new()
            };
        };

        let (emptied, remaining) = match self.store.get_mut(&lobby_id) {
            Ok(lobby) => {
                if !lobby.remove_player(conn) {
                    debug!(%conn, lobby = %lobby_id, "connection was not seated");
                }
                (lobby.is_empty(), lobby.members())
            }
            Err(err) => {
                warn!(%conn, %err, "binding pointed at a dead lobby");
                return if reply {
                    vec![direct(conn, lobby_not_found())]
                } else {
                    Vec::new()
                };
            }
        };

        let mut deliveries = Vec::new();
        if emptied {
            if let Err(err) = self.store.remove(&lobby_id) {
                warn!(%err, "evicting emptied lobby failed");
            }
            if reply {
                deliveries.push(direct(conn, ServerMessage::LeftLobby));
                deliveries.push(direct(
                    conn,
                    ServerMessage::LobbyRemoved { lobby_id },
                ));
            }
        } else {
            let gone = ServerMessage::PlayerLeft {
                lobby_id: lobby_id.clone(),
            };
            deliveries.extend(remaining.into_iter().map(|to| Delivery {
                to,
                message: gone.clone(),
            }));
            if reply {
                deliveries.push(direct(conn, ServerMessage::LeftLobby));
            }
        }
        deliveries
    }

    fn get_lobbies(&mut self, from: ConnectionId) -> Vec<Delivery> {
        vec![direct(
            from,
            ServerMessage::GetLobbies {
                sessions: self.store.summaries(),
            },
        )]
    }
}
