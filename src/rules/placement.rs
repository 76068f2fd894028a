//! Placement legality.
//!
//! A player's first move claims an unowned cell at starting power; every
//! later move adds one unit to a cell the player already owns. Nothing
//! else is legal.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Position};
use crate::core::{IllegalReason, MoveError, PlayerId};

/// Power granted by a first move.
pub const FIRST_MOVE_POWER: u32 = 3;

/// The two kinds of legal placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Claim an unowned cell at [`FIRST_MOVE_POWER`].
    First,
    /// Add one unit of power to an owned cell.
    Reinforce,
}

impl Placement {
    /// Decide which placement, if any, `player` may make on `cell`.
    pub fn classify(cell: Cell, player: PlayerId, has_moved: bool) -> Result<Self, IllegalReason> {
        match (has_moved, cell.owner()) {
            (false, None) => Ok(Placement::First),
            (false, Some(_)) => Err(IllegalReason::CellOccupied),
            (true, Some(owner)) if owner == player => Ok(Placement::Reinforce),
            (true, _) => Err(IllegalReason::NotOwner),
        }
    }

    /// Power added to the board by this placement.
    #[must_use]
    pub fn power_added(self) -> u32 {
        match self {
            Placement::First => FIRST_MOVE_POWER,
            Placement::Reinforce => 1,
        }
    }

    /// Write the placement to `board`. Legality must already be checked.
    pub(crate) fn apply(self, board: &mut Board, player: PlayerId, pos: Position) -> Result<Cell, MoveError> {
        let cell = match self {
            Placement::First => Cell::owned(player, FIRST_MOVE_POWER),
            Placement::Reinforce => {
                let current = board.get(pos)?;
                Cell::owned(player, current.power() + 1)
            }
        };
        board.set(pos, cell)?;
        Ok(cell)
    }
}
