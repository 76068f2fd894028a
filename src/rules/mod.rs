//! Game rules: placement legality, turn sequencing, and the engine trait.

mod engine;
mod placement;
mod turn;

pub use engine::{MoveReport, MoveResult, RulesEngine};
pub use placement::{Placement, FIRST_MOVE_POWER};
pub use turn::{Phase, TurnManager};
