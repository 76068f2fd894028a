//! Cascade resolution.
//!
//! After a placement, every cell at or above capacity explodes: it resets
//! to empty and hands one unit of power, plus its owner's colour, to each
//! existing orthogonal neighbour. Neighbours pushed to capacity explode in
//! the next wave, and so on until the board is stable.
//!
//! The engine consumes two things from a run:
//! - The settled board, which is all the rules care about.
//! - A [`CascadeReport`], the wave-labelled replay log a renderer can use
//!   to stage the chain over time.
//!
//! ```
//! use chain_reaction::board::{Board, Cell, Position};
//! use chain_reaction::cascade::CascadeProcessor;
//! use chain_reaction::core::PlayerId;
//!
//! let mut cells = vec![Cell::EMPTY; 9];
//! cells[0] = Cell::owned(PlayerId(0), 4);
//! let mut board = Board::from_cells(3, 3, 4, cells).unwrap();
//! assert!(board.is_overloaded(Position::new(0, 0)));
//!
//! let report = CascadeProcessor::default().run(&mut board).unwrap();
//! assert_eq!(report.explosions(), 1);
//! assert_eq!(board.owned_count(PlayerId(0)), 2);
//! ```

mod event;
mod processor;

pub use event::{AnimationHint, CascadeEvent, CascadeReport, EventKind};
pub use processor::CascadeProcessor;
