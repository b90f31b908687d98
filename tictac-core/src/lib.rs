//! tictac-core - domain layer for the tictac coordination server
//!
//! Pure state, no I/O: board values, the per-match lobby state machine, the
//! store that owns live lobbies, connection-to-lobby bindings, and the
//! single-player move search. The server crate drives all of it and is the
//! only place that knows about real sockets.

pub mod board;
pub mod error;
pub mod lobby;
pub mod registry;
pub mod search;
pub mod store;

pub use board::{BOARD_SIZE, Board, Cell, Mark, Outcome, OutcomeKind};
pub use error::{GameError, MoveError};
pub use lobby::{Lobby, LobbyPhase, MAX_PLAYERS, Player};
pub use registry::{ConnectionId, ConnectionRegistry};
pub use search::best_move;
pub use store::{LobbyId, LobbyStore, LobbySummary};
