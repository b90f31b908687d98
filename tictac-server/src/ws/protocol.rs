//! WebSocket protocol message types
//!
//! One JSON object per event: a SCREAMING_SNAKE `type` tag plus flat
//! camelCase payload fields. Boards travel as 3x3 arrays of `""`/`"X"`/`"O"`
//! strings.

use serde::{Deserialize, Serialize};
use tictac_core::{Board, LobbyId, LobbySummary, Mark, MoveError, OutcomeKind};

/// A seat as shown to clients. Connection identity never crosses the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub mark: Mark,
}

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotYourTurn,
    CellOccupied,
    OutOfBounds,
    GameFinished,
}

impl From<MoveError> for RejectReason {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::NotYourTurn => RejectReason::NotYourTurn,
            MoveError::CellOccupied { .. } => RejectReason::CellOccupied,
            MoveError::OutOfBounds { .. } => RejectReason::OutOfBounds,
            MoveError::GameFinished => RejectReason::GameFinished,
        }
    }
}

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Open a new lobby with the sender as its first player
    CreateLobby,

    /// Take the open seat in an existing lobby
    #[serde(rename_all = "camelCase")]
    JoinLobby { lobby_id: LobbyId },

    /// Claim a cell for `mark`
    MakeMove { row: usize, col: usize, mark: Mark },

    /// Wipe the board and start over
    RestartGame,

    /// Give up the seat (and the lobby, if it empties)
    LeaveLobby,

    /// Ask for the current lobby directory
    GetLobbies,
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Direct reply to CREATE_LOBBY
    #[serde(rename_all = "camelCase")]
    LobbyCreated {
        lobby_id: LobbyId,
        players: Vec<PlayerInfo>,
        board: Board,
        next_move: Mark,
    },

    /// Direct reply to a successful JOIN_LOBBY, including the joiner's mark
    #[serde(rename_all = "camelCase")]
    JoinedLobby {
        lobby_id: LobbyId,
        players: Vec<PlayerInfo>,
        board: Board,
        next_move: Mark,
        mark: Mark,
    },

    /// Broadcast to the members already seated when someone joins
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        lobby_id: LobbyId,
        players: Vec<PlayerInfo>,
    },

    /// Broadcast to the lobby after every accepted move
    #[serde(rename_all = "camelCase")]
    MoveMade {
        lobby_id: LobbyId,
        board: Board,
        next_move: Mark,
    },

    /// Direct reply when a move fails validation
    #[serde(rename_all = "camelCase")]
    MoveRejected {
        lobby_id: LobbyId,
        reason: RejectReason,
    },

    /// Broadcast after the move that ended the game
    #[serde(rename_all = "camelCase")]
    GameOver {
        lobby_id: LobbyId,
        winner: Option<Mark>,
        outcome: OutcomeKind,
    },

    /// Broadcast after a restart
    #[serde(rename_all = "camelCase")]
    LobbyRestarted {
        lobby_id: LobbyId,
        board: Board,
        next_move: Mark,
    },

    /// Broadcast to the remaining member when a player leaves
    #[serde(rename_all = "camelCase")]
    PlayerLeft { lobby_id: LobbyId },

    /// Direct acknowledgment of LEAVE_LOBBY
    LeftLobby,

    /// Direct notice that the leaver's lobby was destroyed with them
    #[serde(rename_all = "camelCase")]
    LobbyRemoved { lobby_id: LobbyId },

    /// Direct error replies
    LobbyNotFound { message: String },
    LobbyFull { message: String },
    AlreadyInLobby { message: String },

    /// Direct reply to GET_LOBBIES
    GetLobbies { sessions: Vec<LobbySummary> },
}
