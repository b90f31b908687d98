//! Board value types and outcome evaluation
//!
//! A `Board` is a plain 3x3 value. Mutation goes through `with_move`, which
//! returns a fresh copy, so no two lobbies (or no lobby and an in-flight
//! search) can ever alias the same grid.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::MoveError;

/// One of the two symbols a player plays as. Serializes as `"X"` / `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The mark the other player holds.
    pub fn opposite(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single grid cell.
///
/// Serializes as `""`, `"X"` or `"O"` so a board crosses the wire as a 3x3
/// array of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Taken(Mark),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Taken(mark) => Some(mark),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_str(""),
            Cell::Taken(mark) => serializer.serialize_str(mark.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        match text.as_str() {
            "" => Ok(Cell::Empty),
            "X" => Ok(Cell::Taken(Mark::X)),
            "O" => Ok(Cell::Taken(Mark::O)),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &r#"one of "", "X" or "O""#,
            )),
        }
    }
}

/// Rows and columns per side.
pub const BOARD_SIZE: usize = 3;

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// The 3x3 grid.
///
/// `Copy` on purpose: `with_move` works on a copy and the caller swaps the
/// result in, so an observer never sees a half-applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board([[Cell; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    /// A blank board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one cell. Coordinates outside `[0, 3)` are an error, not a panic.
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, MoveError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(MoveError::OutOfBounds { row, col });
        }
        Ok(self.0[row][col])
    }

    /// A copy of this board with exactly one cell filled in.
    ///
    /// Fails when the coordinates are out of range or the cell is taken;
    /// never overwrites.
    pub fn with_move(self, row: usize, col: usize, mark: Mark) -> Result<Board, MoveError> {
        if !self.cell(row, col)?.is_empty() {
            return Err(MoveError::CellOccupied { row, col });
        }
        let mut next = self;
        next.0[row][col] = Cell::Taken(mark);
        Ok(next)
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Cells that are still empty, in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.0[row][col].is_empty() {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    /// Classify the board: a filled line wins, a full board ties, anything
    /// else continues. Lines are mutually exclusive on a well-formed board,
    /// so scan order does not matter.
    pub fn outcome(&self) -> Outcome {
        for line in LINES {
            let [a, b, c] = line.map(|(row, col)| self.0[row][col]);
            if let Cell::Taken(mark) = a {
                if a == b && b == c {
                    return Outcome::Win(mark);
                }
            }
        }
        if self.is_full() {
            Outcome::Tie
        } else {
            Outcome::Continue
        }
    }
}

/// Terminal classification of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The game is still live.
    Continue,
    /// Three in a row for the given mark.
    Win(Mark),
    /// Full board, no line.
    Tie,
}

impl Outcome {
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::Win(mark) => Some(mark),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Continue)
    }

    pub fn kind(self) -> OutcomeKind {
        match self {
            Outcome::Continue => OutcomeKind::Continue,
            Outcome::Win(_) => OutcomeKind::Win,
            Outcome::Tie => OutcomeKind::Tie,
        }
    }
}

/// Wire name of an outcome (`"continue"` / `"win"` / `"tie"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Continue,
    Win,
    Tie,
}
