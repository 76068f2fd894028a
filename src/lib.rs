//! # chain-reaction
//!
//! Rules engine for turn-based territorial chain-reaction games
//! ("Chain Reaction", "Color War") for 2-4 players sharing one device.
//!
//! ## Design Principles
//!
//! 1. **No presentation coupling**: The engine owns the board and turn
//!    state. Renderers read a [`Snapshot`] and replay the cascade log; they
//!    never hold game logic.
//!
//! 2. **Atomic moves**: A move is validated before anything changes, then
//!    resolved on scratch copies and committed in one step.
//!
//! 3. **Deterministic**: The seating shuffle is the only randomness, and it
//!    is seeded. The same seed and moves always give the same game.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, configuration, errors
//! - `board`: Positions, cells, the grid store
//! - `cascade`: Wave-ordered explosion propagation and its replay log
//! - `rules`: Placement legality, turn sequencing, `RulesEngine`
//! - `games`: The chain-reaction game itself
//!
//! ## Example
//!
//! ```
//! use chain_reaction::{GameBuilder, PlayerId, Position, RulesEngine};
//!
//! let mut game = GameBuilder::new()
//!     .player_count(2)
//!     .board_size(1, 2)
//!     .player_order(vec![PlayerId(0), PlayerId(1)])
//!     .build()
//!     .unwrap();
//!
//! game.apply_move(PlayerId(0), Position::new(0, 0)).unwrap();
//! game.apply_move(PlayerId(1), Position::new(0, 1)).unwrap();
//! let report = game.apply_move(PlayerId(0), Position::new(0, 0)).unwrap();
//!
//! assert_eq!(report.cascade.explosions(), 2);
//! assert_eq!(game.winner(), Some(PlayerId(0)));
//! ```

pub mod core;
pub mod board;
pub mod cascade;
pub mod rules;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap, GameRng,
    GameConfig, CascadePolicy, BoardSize,
    MoveError, ConfigError, BoardError, ErrorKind, IllegalReason,
};

pub use crate::board::{Board, Cell, Position};

pub use crate::cascade::{AnimationHint, CascadeEvent, CascadeProcessor, CascadeReport, EventKind};

pub use crate::rules::{MoveReport, MoveResult, Phase, Placement, RulesEngine, TurnManager};

pub use crate::games::chain_reaction::{ChainReaction, GameBuilder, Snapshot};
