//! Round engine: four dice, one cursor, one verdict.
//!
//! A round owns its dice, the sequencing cursor and the derived scores.
//! Callers drive it with two requests:
//!
//! - `request_roll(index)`: validated against the cursor and the die budget,
//!   then committed atomically (value, score, cursor).
//! - `end_round()`: compares the effective score with the level target.
//!
//! Four equal values end the round on the spot with a pass.
//!
//! ## Example
//!
//! ```
//! use dice_ladder::core::RoundConfig;
//! use dice_ladder::round::{RoundEngine, RollRejection};
//!
//! let mut round = RoundEngine::new(RoundConfig::new(1).with_seed(42), 1);
//!
//! // Only the first two dice are reachable at the start.
//! assert!(matches!(
//!     round.request_roll(2),
//!     Err(RollRejection::SequencingViolation { .. })
//! ));
//!
//! let outcome = round.request_roll(0).unwrap();
//! assert_eq!(outcome.raw_sum, outcome.value);
//!
//! let summary = round.end_round().unwrap();
//! assert_eq!(summary.target_score, 20);
//! ```

mod engine;
mod error;
mod sequencing;

pub use engine::{RoundEngine, RoundSnapshot};
pub use error::{RollRejection, SnapshotError};
pub use sequencing::{DieState, Sequencer};

use serde::{Deserialize, Serialize};

use crate::core::{DieId, DICE_PER_ROUND};

/// Fact emitted on a pass: level `N` is now playable.
///
/// The persistence collaborator merges it as `max(stored, N)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnlockLevel(pub u32);

/// Final result of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Level that was played.
    pub level: u32,
    /// Whether the level was cleared.
    pub passed: bool,
    /// Cleared by four equal values rather than by score.
    pub instant_win: bool,
    /// Effective score when the round ended.
    pub effective_score: u32,
    /// Score the level asked for.
    pub target_score: u32,
    /// Plain sum of the final die values.
    pub raw_sum: u32,
    /// Level unlocked by this round, if it passed.
    pub unlocks: Option<UnlockLevel>,
}

/// What a committed roll means for the round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The round goes on; `end_round` is available.
    Continue,
    /// Four equal values. The round is over and passed.
    InstantWin(RoundSummary),
}

/// Everything a caller needs after a committed roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// The die that was rolled.
    pub die: DieId,
    /// Face it landed on.
    pub value: u32,
    /// Plain sum of all current values.
    pub raw_sum: u32,
    /// Effective score after the roll.
    pub effective_score: u32,
    /// Cursor after the roll.
    pub active: DieId,
    /// Derived state of each die after the roll.
    pub states: [DieState; DICE_PER_ROUND],
    /// Continue or instant win.
    pub verdict: Verdict,
}

impl RollOutcome {
    /// Whether this roll ended the round.
    #[must_use]
    pub fn ended_round(&self) -> bool {
        matches!(self.verdict, Verdict::InstantWin(_))
    }
}
