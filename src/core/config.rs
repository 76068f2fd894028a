//! Game configuration.
//!
//! A `GameConfig` fixes everything about a game before the first move:
//! - Seat count (2-4)
//! - Board dimensions and explosion capacity
//! - Seating order source (seeded shuffle or explicit permutation)
//! - Which cascade ruleset the deployment plays
//!
//! Board dimensions per seat count are a table lookup here, not engine
//! logic; the engine accepts any rows×cols that fits the players.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::PlayerId;
use crate::board::MAX_NEIGHBORS;

/// Default explosion threshold.
pub const DEFAULT_CAPACITY: u32 = 4;

/// Smallest and largest supported seat counts.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Cascade ruleset switches.
///
/// Published copies of the game disagree on whether a captured cell
/// sitting one below capacity explodes on the spot. Deployments pick one
/// ruleset here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CascadePolicy {
    /// When set, a neighbour whose owner changes and whose power lands at
    /// exactly `capacity - 1` explodes in the next wave.
    pub explode_on_conversion_at_threshold: bool,
}

impl CascadePolicy {
    /// Classic ruleset: cells explode only at capacity.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            explode_on_conversion_at_threshold: false,
        }
    }

    /// "Division" ruleset: captures at `capacity - 1` explode too.
    #[must_use]
    pub const fn division() -> Self {
        Self {
            explode_on_conversion_at_threshold: true,
        }
    }
}

/// Board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    pub rows: usize,
    pub cols: usize,
}

impl BoardSize {
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Recommended board for a seat count: smaller boards for fewer players.
    ///
    /// ```
    /// use chain_reaction::core::BoardSize;
    ///
    /// assert_eq!(BoardSize::recommended(2), BoardSize::new(6, 6));
    /// assert_eq!(BoardSize::recommended(4), BoardSize::new(9, 9));
    /// ```
    #[must_use]
    pub const fn recommended(player_count: usize) -> Self {
        match player_count {
            0..=2 => Self::new(6, 6),
            3 => Self::new(8, 8),
            _ => Self::new(9, 9),
        }
    }
}

/// Complete configuration for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats (2-4).
    pub player_count: usize,

    pub rows: usize,
    pub cols: usize,

    /// Power at or above which a cell explodes. Must be at least the
    /// largest neighbour count so explosions never create power.
    pub capacity: u32,

    /// Seed for the seating shuffle. `None` draws one from OS entropy.
    pub seed: Option<u64>,

    /// Explicit seating order. Overrides the shuffle when present.
    pub player_order: Option<Vec<PlayerId>>,

    pub cascade: CascadePolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_players(MIN_PLAYERS)
    }
}

impl GameConfig {
    /// Configuration using the recommended board for `player_count`.
    #[must_use]
    pub fn for_players(player_count: usize) -> Self {
        let size = BoardSize::recommended(player_count);
        Self {
            player_count,
            rows: size.rows,
            cols: size.cols,
            capacity: DEFAULT_CAPACITY,
            seed: None,
            player_order: None,
            cascade: CascadePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_board_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_player_order(mut self, order: Vec<PlayerId>) -> Self {
        self.player_order = Some(order);
        self
    }

    #[must_use]
    pub fn with_cascade(mut self, cascade: CascadePolicy) -> Self {
        self.cascade = cascade;
        self
    }

    /// Check that a game can be played with this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::PlayerCount(self.player_count));
        }

        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyBoard {
                rows: self.rows,
                cols: self.cols,
            });
        }

        // Opening placements never explode, so each seat needs its own cell.
        if self.rows.saturating_mul(self.cols) < self.player_count {
            return Err(ConfigError::BoardTooSmall {
                rows: self.rows,
                cols: self.cols,
                players: self.player_count,
            });
        }

        if self.capacity < MAX_NEIGHBORS {
            return Err(ConfigError::CapacityTooLow {
                capacity: self.capacity,
                min: MAX_NEIGHBORS,
            });
        }

        if let Some(order) = &self.player_order {
            validate_order(order, self.player_count)?;
        }

        Ok(())
    }
}

fn validate_order(order: &[PlayerId], player_count: usize) -> Result<(), ConfigError> {
    let invalid = |detail: String| ConfigError::InvalidOrder {
        players: player_count,
        detail,
    };

    if order.len() != player_count {
        return Err(invalid(format!("expected {} seats, got {}", player_count, order.len())));
    }

    let mut seen = vec![false; player_count];
    for &player in order {
        match seen.get_mut(player.index()) {
            None => return Err(invalid(format!("{} is not seated", player))),
            Some(true) => return Err(invalid(format!("{} appears twice", player))),
            Some(slot) => *slot = true,
        }
    }

    Ok(())
}
