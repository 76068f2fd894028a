//! Board representation: coordinates, cells, and the grid store.

mod cell;
mod grid;
mod position;

pub use cell::Cell;
pub use grid::Board;
pub use position::Position;

/// Most neighbours a cell can have on a rectangular grid.
pub const MAX_NEIGHBORS: u32 = 4;
