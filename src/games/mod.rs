//! Concrete games built on the engine.

pub mod chain_reaction;
