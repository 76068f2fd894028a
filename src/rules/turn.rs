//! Turn sequencing, elimination, and win detection.
//!
//! ## Lifecycle
//!
//! - `AwaitingMove(p)`: `p` is the next seat in the fixed order that is
//!   still alive.
//! - An accepted move clears the mover's first-move flag, then the engine
//!   calls `update_eliminations`, `check_winner` and `advance` in that order.
//! - `GameOver(w)`: one seat left standing; no further moves.
//!
//! No one is eliminated while any seat still has its first move to make.

use log::info;
use serde::{Deserialize, Serialize};

use super::Placement;
use crate::board::{Board, Position};
use crate::core::{GameRng, MoveError, PlayerId, PlayerMap};

/// Externally visible turn state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingMove(PlayerId),
    GameOver(PlayerId),
}

/// Seating order, per-seat flags and the turn cursor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnManager {
    order: Vec<PlayerId>,
    turn_index: usize,
    has_moved: PlayerMap<bool>,
    alive: PlayerMap<bool>,
    winner: Option<PlayerId>,
    turn_number: u32,
}

impl TurnManager {
    /// Start a game with an explicit seating order.
    ///
    /// `order` must be a permutation of `0..order.len()`; `GameConfig`
    /// validation guarantees this for engine-built games.
    #[must_use]
    pub fn new(order: Vec<PlayerId>) -> Self {
        let player_count = order.len();
        Self {
            order,
            turn_index: 0,
            has_moved: PlayerMap::with_value(player_count, false),
            alive: PlayerMap::with_value(player_count, true),
            winner: None,
            turn_number: 1,
        }
    }

    /// Start a game with a seeded random seating order.
    #[must_use]
    pub fn shuffled(player_count: usize, rng: &mut GameRng) -> Self {
        let mut order: Vec<PlayerId> = PlayerId::all(player_count).collect();
        rng.shuffle(&mut order);
        Self::new(order)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.order.len()
    }

    /// Seating order, fixed for the game.
    #[must_use]
    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.order[self.turn_index]
    }

    /// 1-based count of the move about to be made.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.winner {
            Some(winner) => Phase::GameOver(winner),
            None => Phase::AwaitingMove(self.current_player()),
        }
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.alive.get(player).copied().unwrap_or(false)
    }

    /// Live seats in seat order.
    #[must_use]
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.alive.players_where(|a| *a)
    }

    #[must_use]
    pub fn has_moved_first(&self, player: PlayerId) -> bool {
        self.has_moved.get(player).copied().unwrap_or(false)
    }

    /// True until every seat has made its first placement.
    #[must_use]
    pub fn in_setup(&self) -> bool {
        self.has_moved.iter().any(|(_, moved)| !moved)
    }

    /// Reject moves after the game ends or out of turn.
    pub fn ensure_turn(&self, player: PlayerId) -> Result<(), MoveError> {
        if let Some(winner) = self.winner {
            return Err(MoveError::GameAlreadyOver { winner });
        }
        let current = self.current_player();
        if player != current {
            return Err(MoveError::NotYourTurn { player, current });
        }
        Ok(())
    }

    /// Full legality check for `player` placing at `pos`. Mutates nothing.
    pub fn check_placement(
        &self,
        board: &Board,
        player: PlayerId,
        pos: Position,
    ) -> Result<Placement, MoveError> {
        self.ensure_turn(player)?;
        let cell = board.get(pos)?;
        Placement::classify(cell, player, self.has_moved_first(player)).map_err(|reason| {
            MoveError::IllegalMove {
                player,
                position: pos,
                reason,
            }
        })
    }

    /// Note that `player` has moved.
    pub(crate) fn record_move(&mut self, player: PlayerId) {
        if self.has_moved.contains(player) {
            self.has_moved[player] = true;
        }
        self.turn_number += 1;
    }

    /// Mark every seat with no cells left as eliminated.
    ///
    /// Returns the newly eliminated seats. Does nothing during setup.
    pub(crate) fn update_eliminations(&mut self, board: &Board) -> Vec<PlayerId> {
        if self.in_setup() {
            return Vec::new();
        }

        let counts = board.cell_counts(self.player_count());
        let mut eliminated = Vec::new();
        for player in self.alive_players() {
            if counts[player] == 0 {
                self.alive[player] = false;
                info!("{} eliminated on turn {}", player, self.turn_number);
                eliminated.push(player);
            }
        }
        eliminated
    }

    /// Declare a winner once a single seat remains.
    pub(crate) fn check_winner(&mut self) -> Result<Option<PlayerId>, MoveError> {
        match self.alive_players().as_slice() {
            [] => Err(MoveError::InvariantViolation(
                "every player has been eliminated".to_string(),
            )),
            [last] => {
                self.winner = Some(*last);
                info!("{} wins on turn {}", last, self.turn_number);
                Ok(Some(*last))
            }
            _ => Ok(None),
        }
    }

    /// Move the cursor to the next live seat and return it.
    pub(crate) fn advance(&mut self) -> Result<PlayerId, MoveError> {
        let count = self.order.len();
        for step in 1..=count {
            let idx = (self.turn_index + step) % count;
            if self.is_alive(self.order[idx]) {
                self.turn_index = idx;
                return Ok(self.order[idx]);
            }
        }
        Err(MoveError::InvariantViolation(
            "no live player to take the next turn".to_string(),
        ))
    }
}
