//! Forward-only turn sequencing.
//!
//! A round keeps a single cursor, the active die. The active die and the one
//! right after it may be rolled; everything else is locked. Rolling the next
//! die moves the cursor onto it, which locks every die behind it for the rest
//! of the round.

use serde::{Deserialize, Serialize};

use crate::core::{DieId, DICE_PER_ROUND};

/// Rollability of a die, derived from the cursor and its remaining budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieState {
    /// Behind the cursor, more than one step ahead of it, or the round is over.
    Locked,
    /// Under the cursor.
    Active,
    /// One step ahead of the cursor. Rolling it advances the cursor.
    NextAvailable,
    /// Active or next, but out of rolls.
    Exhausted,
}

impl DieState {
    /// Whether a roll request for this die may proceed.
    #[must_use]
    pub fn is_rollable(self) -> bool {
        matches!(self, DieState::Active | DieState::NextAvailable)
    }
}

/// The active/next window over the dice of one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequencer {
    active: u8,
}

impl Sequencer {
    /// Start a round with the first die active.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with `active` under the cursor.
    #[must_use]
    pub fn with_active(active: DieId) -> Self {
        assert!(active.index() < DICE_PER_ROUND, "{} is not a round slot", active);
        Self { active: active.0 }
    }

    /// The die under the cursor.
    #[must_use]
    pub fn active(&self) -> DieId {
        DieId(self.active)
    }

    /// Derived state of `die` given how many rolls it has left.
    #[must_use]
    pub fn state_of(&self, die: DieId, rolls_left: u32) -> DieState {
        let window = if die.0 == self.active {
            DieState::Active
        } else if Some(die.0) == self.active.checked_add(1) && die.index() < DICE_PER_ROUND {
            DieState::NextAvailable
        } else {
            return DieState::Locked;
        };

        if rolls_left == 0 {
            DieState::Exhausted
        } else {
            window
        }
    }

    /// Record a committed roll of `die`.
    ///
    /// Returns `true` when the cursor moved. The cursor only ever moves
    /// forward, and only onto the die that was just rolled.
    pub fn record_roll(&mut self, die: DieId) -> bool {
        debug_assert!(
            die.0 <= self.active.saturating_add(1),
            "{} rolled outside the window",
            die
        );
        if die.0 > self.active {
            self.active = die.0;
            true
        } else {
            false
        }
    }
}
