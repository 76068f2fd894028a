//! Error types for game construction and move submission.
//!
//! Every rejected move is reported as a `MoveError` value. None of them
//! leave the game in a partially-applied state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PlayerId;
use crate::board::Position;

/// Why a placement on a valid coordinate was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IllegalReason {
    /// First move onto a cell that already has an owner.
    CellOccupied,
    /// Reinforcement of a cell the mover does not own.
    NotOwner,
}

impl std::fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalReason::CellOccupied => write!(f, "first move must target an unowned cell"),
            IllegalReason::NotOwner => write!(f, "can only reinforce your own cells"),
        }
    }
}

/// A rejected move.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("position {position} is outside the {rows}x{cols} board")]
    OutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },
    #[error("{player} moved out of turn; it is {current}'s turn")]
    NotYourTurn { player: PlayerId, current: PlayerId },
    #[error("{player} cannot place at {position}: {reason}")]
    IllegalMove {
        player: PlayerId,
        position: Position,
        reason: IllegalReason,
    },
    #[error("game is over, {winner} already won")]
    GameAlreadyOver { winner: PlayerId },
    /// Engine defect: a state the rules should make unreachable.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Flat tag for a `MoveError`, for callers that only need the category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    OutOfBounds,
    NotYourTurn,
    IllegalMove,
    GameAlreadyOver,
    InvariantViolation,
}

impl MoveError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoveError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            MoveError::NotYourTurn { .. } => ErrorKind::NotYourTurn,
            MoveError::IllegalMove { .. } => ErrorKind::IllegalMove,
            MoveError::GameAlreadyOver { .. } => ErrorKind::GameAlreadyOver,
            MoveError::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }
}

/// A game configuration that cannot be played.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count must be 2-4, got {0}")]
    PlayerCount(usize),
    #[error("board must have at least one row and one column, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },
    #[error("a {rows}x{cols} board has fewer cells than the {players} players need")]
    BoardTooSmall {
        rows: usize,
        cols: usize,
        players: usize,
    },
    #[error("capacity must be at least {min}, got {capacity}")]
    CapacityTooLow { capacity: u32, min: u32 },
    #[error("player order must be a permutation of the {players} players: {detail}")]
    InvalidOrder { players: usize, detail: String },
}

/// Board or cell data that breaks the grid's own rules.
///
/// Only reachable from external data (deserialisation or
/// `Board::from_cells`); the engine never produces it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("unowned cell cannot hold power, got {power}")]
    UnownedPower { power: u32 },
    #[error("board must have at least one row and one column, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },
    #[error("a {rows}x{cols} board needs {expected} cells, got {found}")]
    CellCount {
        rows: usize,
        cols: usize,
        expected: usize,
        found: usize,
    },
}
