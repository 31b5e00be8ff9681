//! Traits describing read-only engine inputs.
//!
//! Oracles expose racial base tables and deterministic randomness. The engine
//! reads them without coupling to a concrete content source.
mod races;
mod rng;

pub use races::{RaceDefinition, RaceKind, RaceOracle};
pub use rng::{CombatRng, FixedRolls, PcgRng, RngOracle, RollKind, SeededRolls, compute_seed};
