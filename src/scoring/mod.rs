//! Scoring: turning die values into an effective score.
//!
//! Scoring is a pure function of the value multiset and the level rules:
//!
//! 1. Group equal values.
//! 2. Four equal values win the round outright.
//! 3. Each group pays `value * count * multiplier` (triplet, pair, or 1).
//! 4. The best 3-value straight, if it pays more than the groups it
//!    overlaps, adds its gain once.
//!
//! ```
//! use dice_ladder::core::LevelRules;
//! use dice_ladder::scoring::evaluate;
//!
//! let eval = evaluate(&[2, 3, 4, 6], &LevelRules::for_level(2));
//! assert_eq!(eval.effective_score(), Some(33));
//! ```

mod evaluate;

pub use evaluate::{evaluate, raw_sum, Evaluation, GroupScore, ScoreBreakdown, StraightBonus};
