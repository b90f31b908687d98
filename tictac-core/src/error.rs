//! Domain error types
//!
//! Two enums, matching the two ways a request can fail: membership/lookup
//! errors get their own protocol events, move-legality errors get a
//! rejection reply.

use thiserror::Error;

use crate::store::LobbyId;

/// Membership and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// No live lobby with that identifier
    #[error("lobby not found: {0}")]
    LobbyNotFound(LobbyId),

    /// Both seats are taken
    #[error("lobby {0} is already full")]
    LobbyFull(LobbyId),

    /// The connection is already bound to a lobby
    #[error("connection is already in a lobby")]
    AlreadyInLobby,
}

/// Move-legality failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The claimed mark does not hold the turn
    #[error("it is not that mark's turn")]
    NotYourTurn,

    /// The target cell already holds a mark
    #[error("cell ({row}, {col}) is already taken")]
    CellOccupied { row: usize, col: usize },

    /// Coordinates outside the 3x3 grid
    #[error("coordinates ({row}, {col}) are outside the board")]
    OutOfBounds { row: usize, col: usize },

    /// The game already has a terminal outcome
    #[error("the game is already over")]
    GameFinished,
}
