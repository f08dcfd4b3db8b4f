//! Core types: dice, randomness, level rules and round configuration.
//!
//! Everything here is independent of turn sequencing; the round engine
//! builds on top of these pieces.

pub mod config;
pub mod die;
pub mod rng;

pub use config::{LevelRules, RoundConfig, DEFAULT_FACES, DICE_PER_ROUND, MAX_LEVEL};
pub use die::{Die, DieError, DieId, RollRecord, DEFAULT_ROLL_BUDGET};
pub use rng::{DiceRng, DiceRngState};
