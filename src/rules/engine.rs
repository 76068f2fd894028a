//! Rules engine trait and move outcomes.
//!
//! Games implement `RulesEngine` to expose:
//! - Which placements are legal
//! - How a placement changes the game
//! - When the game is over
//!
//! ## Implementation Notes
//!
//! - `check_move` must not mutate anything
//! - `apply_move` is all-or-nothing: a rejected move leaves no trace
//! - Everything after construction must be deterministic

use serde::{Deserialize, Serialize};

use super::Placement;
use crate::board::{Board, Position};
use crate::cascade::{CascadeEvent, CascadeReport};
use crate::core::{ErrorKind, GameConfig, MoveError, PlayerId};

/// What an accepted move did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub player: PlayerId,
    pub position: Position,
    pub placement: Placement,
    pub cascade: CascadeReport,
    /// Seats knocked out by this move.
    pub eliminated: Vec<PlayerId>,
    /// Set when this move ended the game.
    pub winner: Option<PlayerId>,
    /// Seat to move next; `None` once the game is over.
    pub next_player: Option<PlayerId>,
}

/// Flattened move outcome for presentation layers that prefer a single
/// record over a `Result`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub accepted: bool,
    pub reason: Option<ErrorKind>,
    pub events: Vec<CascadeEvent>,
}

impl From<Result<MoveReport, MoveError>> for MoveResult {
    fn from(result: Result<MoveReport, MoveError>) -> Self {
        match result {
            Ok(report) => MoveResult {
                accepted: true,
                reason: None,
                events: report.cascade.into_events(),
            },
            Err(err) => MoveResult {
                accepted: false,
                reason: Some(err.kind()),
                events: Vec::new(),
            },
        }
    }
}

/// Rules engine trait.
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Current board.
    fn board(&self) -> &Board;

    /// Validate a placement without applying it.
    fn check_move(&self, player: PlayerId, pos: Position) -> Result<Placement, MoveError>;

    /// Apply a placement and resolve its cascade.
    fn apply_move(&mut self, player: PlayerId, pos: Position) -> Result<MoveReport, MoveError>;

    /// The winner, once the game has ended.
    fn winner(&self) -> Option<PlayerId>;

    // === Convenience Methods ===

    fn is_legal(&self, player: PlayerId, pos: Position) -> bool {
        self.check_move(player, pos).is_ok()
    }

    /// Every cell `player` could place on right now, row-major.
    ///
    /// Empty when it is not the player's turn or the game is over.
    fn legal_moves(&self, player: PlayerId) -> Vec<Position> {
        self.board()
            .positions()
            .filter(|&pos| self.is_legal(player, pos))
            .collect()
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }
}
