//! # dice-ladder
//!
//! Scoring and sequencing engine for a four-dice level ladder.
//!
//! ## Rules in Brief
//!
//! 1. **Four dice** (d4, d6, d8, d12), each with a small roll budget.
//!
//! 2. **Forward-only sequencing**: only the active die and the one after it
//!    can be rolled. Rolling the next die locks everything behind it.
//!
//! 3. **Level-dependent scoring**: pairs, triplets and 3-value straights pay
//!    multipliers from a per-level table. Four equal values win outright.
//!
//! 4. **Ladder**: reaching the level target unlocks the next level.
//!
//! ## Modules
//!
//! - `core`: Dice, RNG, level rules, round configuration
//! - `scoring`: Pure effective-score evaluation
//! - `round`: Round engine, sequencing state machine, verdicts
//! - `progress`: Unlocked levels and their persistence
//! - `session`: Rounds played against stored progress

pub mod core;
pub mod scoring;
pub mod round;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Die, DieError, DieId, RollRecord,
    DiceRng, DiceRngState,
    LevelRules, RoundConfig, DEFAULT_FACES, DICE_PER_ROUND, MAX_LEVEL,
};

pub use crate::scoring::{evaluate, Evaluation, ScoreBreakdown};

pub use crate::round::{
    DieState, RollOutcome, RollRejection, RoundEngine, RoundSnapshot, RoundSummary,
    SnapshotError, UnlockLevel, Verdict,
};

pub use crate::progress::{
    FileUnlockStore, MemoryUnlockStore, Progress, ProgressRecord, StoreError, UnlockStore,
};

pub use crate::session::{Session, SessionError};
