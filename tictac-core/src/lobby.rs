//! The authoritative state machine for one match

use crate::board::{Board, Mark, Outcome};
use crate::error::{GameError, MoveError};
use crate::registry::ConnectionId;
use crate::store::LobbyId;

/// Seats per lobby.
pub const MAX_PLAYERS: usize = 2;

/// A seat in a lobby: which connection plays which mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    conn: ConnectionId,
    mark: Mark,
}

impl Player {
    pub fn conn(&self) -> ConnectionId {
        self.conn
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }
}

/// Coarse lifecycle phase, derived from seats and outcome rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyPhase {
    /// One player seated, waiting for an opponent
    Waiting,
    /// Two players, game live
    InProgress,
    /// Terminal outcome reached
    Finished,
}

/// One match: seats, board, turn pointer, and outcome.
///
/// All mutation goes through the operations below. The dispatcher serializes
/// calls, so the struct itself carries no locking. A lobby with zero players
/// is never kept around; the store evicts it the moment the last seat
/// empties.
#[derive(Debug, Clone)]
pub struct Lobby {
    id: LobbyId,
    players: Vec<Player>,
    board: Board,
    next_move: Mark,
    outcome: Outcome,
}

impl Lobby {
    /// Open a lobby with its creator seated as X and X to move.
    pub fn new(id: LobbyId, conn: ConnectionId) -> Self {
        Self {
            id,
            players: vec![Player {
                conn,
                mark: Mark::X,
            }],
            board: Board::new(),
            next_move: Mark::X,
            outcome: Outcome::Continue,
        }
    }

    pub fn id(&self) -> &LobbyId {
        &self.id
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn next_move(&self) -> Mark {
        self.next_move
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn occupancy(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn phase(&self) -> LobbyPhase {
        if self.outcome.is_terminal() {
            LobbyPhase::Finished
        } else if self.players.len() < MAX_PLAYERS {
            LobbyPhase::Waiting
        } else {
            LobbyPhase::InProgress
        }
    }

    /// Connections of everyone currently seated.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.players.iter().map(|player| player.conn).collect()
    }

    /// Seat a second player with the mark not already taken (X for a lobby
    /// that somehow has no seats, so the first joiner is always X).
    pub fn join(&mut self, conn: ConnectionId) -> Result<Mark, GameError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::LobbyFull(self.id.clone()));
        }
        let mark = match self.players.first() {
            Some(existing) => existing.mark.opposite(),
            None => Mark::X,
        };
        self.players.push(Player { conn, mark });
        Ok(mark)
    }

    /// Validate and apply one move for `mark`.
    ///
    /// Checks, in order: the game must still be live, `mark` must hold the
    /// turn, and the target must be a real, empty cell. On success the board
    /// is replaced wholesale, the turn flips, and the recomputed outcome is
    /// returned.
    pub fn play(&mut self, mark: Mark, row: usize, col: usize) -> Result<Outcome, MoveError> {
        if self.outcome.is_terminal() {
            return Err(MoveError::GameFinished);
        }
        if mark != self.next_move {
            return Err(MoveError::NotYourTurn);
        }
        self.board = self.board.with_move(row, col, mark)?;
        self.next_move = mark.opposite();
        self.outcome = self.board.outcome();
        Ok(self.outcome)
    }

    /// Reset to a fresh game, keeping the seats. Valid from any phase.
    pub fn restart(&mut self) {
        self.board = Board::new();
        self.next_move = Mark::X;
        self.outcome = Outcome::Continue;
    }

    /// Unseat the player bound to `conn`.
    ///
    /// Idempotent: removing a connection that is not seated is a no-op and
    /// reports `false`.
    pub fn remove_player(&mut self, conn: ConnectionId) -> bool {
        let before = self.players.len();
        self.players.retain(|player| player.conn != conn);
        self.players.len() != before
    }
}
