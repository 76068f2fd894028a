//! Core engine types: players, RNG, configuration, errors.
//!
//! Nothing here knows about cells or cascades; the board and rules modules
//! build on these.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{BoardSize, CascadePolicy, GameConfig, DEFAULT_CAPACITY, MAX_PLAYERS, MIN_PLAYERS};
pub use error::{BoardError, ConfigError, ErrorKind, IllegalReason, MoveError};
