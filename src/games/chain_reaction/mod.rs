//! Chain reaction / Color War for 2-4 players on one device.
//!
//! - Each seat's first move claims an empty cell at power 3
//! - Later moves add 1 power to a cell you own
//! - A cell at capacity (4) explodes into its neighbours, capturing them
//! - After everyone has placed once, a seat with no cells is out
//! - Last seat standing wins

mod game;

pub use game::{ChainReaction, GameBuilder, Snapshot};
