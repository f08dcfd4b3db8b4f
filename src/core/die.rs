//! A single die with a bounded roll budget.
//!
//! ## DieId
//!
//! Type-safe slot identifier for the four dice of a round.
//!
//! ## Die
//!
//! Owns its face count, its budget and the rolls it produced this round.
//! History is an `im::Vector` so cloning a round (snapshots, what-if
//! evaluation) stays O(1).

use std::time::{SystemTime, UNIX_EPOCH};

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rng::DiceRng;

/// Default number of rolls each die allows per round.
pub const DEFAULT_ROLL_BUDGET: u32 = 5;

/// Die slot identifier. Slot 0 is rolled first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DieId(pub u8);

impl DieId {
    /// Create a new die ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw slot index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over the first `count` slots in rolling order.
    pub fn all(count: usize) -> impl Iterator<Item = DieId> {
        (0..count as u8).map(DieId)
    }
}

impl std::fmt::Display for DieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Die({})", self.0)
    }
}

/// Errors raised by a die itself.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DieError {
    #[error("d{sides} has used all {budget} rolls")]
    Exhausted { sides: u32, budget: u32 },

    #[error("d{sides} cannot show {value}")]
    ValueOutOfRange { sides: u32, value: u32 },

    #[error("a die needs at least 2 sides, got {sides}")]
    TooFewSides { sides: u32 },
}

/// One committed roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    /// Face shown, in `1..=sides`.
    pub value: u32,
    /// Wall-clock time of the roll in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

/// A die with a fixed face count and a per-round roll budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    sides: u32,
    roll_budget: u32,
    history: Vector<RollRecord>,
}

impl Die {
    /// Create a die with the default budget.
    #[must_use]
    pub fn new(sides: u32) -> Self {
        Self::with_budget(sides, DEFAULT_ROLL_BUDGET)
    }

    /// Create a die with an explicit roll budget.
    #[must_use]
    pub fn with_budget(sides: u32, roll_budget: u32) -> Self {
        assert!(sides >= 2, "A die needs at least 2 sides");
        Self {
            sides,
            roll_budget,
            history: Vector::new(),
        }
    }

    /// Rebuild a die from recorded rolls, oldest first.
    ///
    /// Fails if the die has fewer than 2 sides, or if the history is longer
    /// than the budget or holds a value the die cannot show.
    pub fn restore(
        sides: u32,
        roll_budget: u32,
        history: impl IntoIterator<Item = RollRecord>,
    ) -> Result<Self, DieError> {
        if sides < 2 {
            return Err(DieError::TooFewSides { sides });
        }
        let mut die = Self::with_budget(sides, roll_budget);
        for record in history {
            if !(1..=sides).contains(&record.value) {
                return Err(DieError::ValueOutOfRange {
                    sides,
                    value: record.value,
                });
            }
            if die.rolls_left() == 0 {
                return Err(DieError::Exhausted {
                    sides,
                    budget: roll_budget,
                });
            }
            die.history.push_back(record);
        }
        Ok(die)
    }

    /// Number of faces.
    #[must_use]
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Lifetime roll budget.
    #[must_use]
    pub fn roll_budget(&self) -> u32 {
        self.roll_budget
    }

    /// Last rolled value, if the die was rolled this round.
    #[must_use]
    pub fn current_value(&self) -> Option<u32> {
        self.history.last().map(|r| r.value)
    }

    /// Rolls still available.
    #[must_use]
    pub fn rolls_left(&self) -> u32 {
        self.roll_budget.saturating_sub(self.history.len() as u32)
    }

    /// Rolls made this round, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<RollRecord> {
        &self.history
    }

    /// Roll once, drawing a fresh face from `rng`.
    pub fn roll(&mut self, rng: &mut DiceRng) -> Result<u32, DieError> {
        if self.rolls_left() == 0 {
            return Err(DieError::Exhausted {
                sides: self.sides,
                budget: self.roll_budget,
            });
        }

        let value = rng.roll(self.sides);
        self.history.push_back(RollRecord {
            value,
            timestamp_ms: now_ms(),
        });
        Ok(value)
    }

    /// Forget every roll. Called at round start.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
