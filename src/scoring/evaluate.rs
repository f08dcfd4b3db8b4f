//! Effective-score evaluation for a set of die values.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::LevelRules;

/// Points earned by one group of equal values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupScore {
    /// The face value shared by the group.
    pub value: u32,
    /// How many dice show it.
    pub count: u32,
    /// Multiplier applied to each die in the group (1 for singles).
    pub multiplier: u32,
    /// `value * count * multiplier`.
    pub points: u32,
}

/// The straight chosen for the bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StraightBonus {
    /// The three consecutive values, ascending.
    pub values: [u32; 3],
    /// Points added on top of the group score.
    pub gain: u32,
}

/// Full explanation of an effective score.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Group contributions, ordered by value.
    pub groups: SmallVec<[GroupScore; 4]>,
    /// Best straight, when one paid out.
    pub straight: Option<StraightBonus>,
}

impl ScoreBreakdown {
    /// Sum of group contributions before any straight bonus.
    #[must_use]
    pub fn base(&self) -> u32 {
        self.groups.iter().map(|g| g.points).sum()
    }

    /// Score compared against the level target.
    #[must_use]
    pub fn effective_score(&self) -> u32 {
        self.base() + self.straight.map_or(0, |s| s.gain)
    }
}

/// Result of evaluating a set of values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Four equal values: the round is won outright and nothing else is scored.
    InstantWin { value: u32 },
    /// Regular scoring.
    Scored(ScoreBreakdown),
}

impl Evaluation {
    /// Check for the four-of-a-kind win.
    #[must_use]
    pub fn is_instant_win(&self) -> bool {
        matches!(self, Evaluation::InstantWin { .. })
    }

    /// Effective score, or `None` for an instant win.
    #[must_use]
    pub fn effective_score(&self) -> Option<u32> {
        match self {
            Evaluation::InstantWin { .. } => None,
            Evaluation::Scored(breakdown) => Some(breakdown.effective_score()),
        }
    }
}

/// Plain sum of the values.
#[must_use]
pub fn raw_sum(values: &[u32]) -> u32 {
    values.iter().sum()
}

/// Evaluate the current die values under a level's rules.
///
/// Order of `values` never changes the score. It only decides which of two
/// equally paying straights is reported: the first one found wins.
#[must_use]
pub fn evaluate(values: &[u32], rules: &LevelRules) -> Evaluation {
    let mut counts: FxHashMap<u32, u32> = FxHashMap::default();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    if let Some((&value, _)) = counts.iter().find(|(_, c)| **c == 4) {
        return Evaluation::InstantWin { value };
    }

    let mut groups: SmallVec<[GroupScore; 4]> = counts
        .iter()
        .map(|(&value, &count)| {
            let multiplier = multiplier_for(count, rules);
            GroupScore {
                value,
                count,
                multiplier,
                points: value * count * multiplier,
            }
        })
        .collect();
    groups.sort_unstable_by_key(|g| g.value);

    let straight = if rules.straights_enabled() && values.len() >= 3 {
        best_straight(values, &counts, rules)
    } else {
        None
    };

    Evaluation::Scored(ScoreBreakdown { groups, straight })
}

/// Per-value multiplier given the value's overall group size.
fn multiplier_for(count: u32, rules: &LevelRules) -> u32 {
    match rules.triplet_multiplier {
        Some(triplet) if count == 3 => triplet,
        _ if count >= 2 => rules.pair_multiplier,
        _ => 1,
    }
}

/// Search every 3-value selection for the straight with the largest gain.
fn best_straight(
    values: &[u32],
    counts: &FxHashMap<u32, u32>,
    rules: &LevelRules,
) -> Option<StraightBonus> {
    let mut best: Option<StraightBonus> = None;
    let mut best_gain = 0i64;

    let n = values.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let picked = [values[i], values[j], values[k]];
                let mut sorted = picked;
                sorted.sort_unstable();
                if sorted[1] != sorted[0] + 1 || sorted[2] != sorted[1] + 1 {
                    continue;
                }

                let straight_sum: u32 = sorted.iter().sum();
                let already_counted: u32 = picked
                    .iter()
                    .map(|v| v * multiplier_for(counts.get(v).copied().unwrap_or(0), rules))
                    .sum();
                let gain = i64::from(straight_sum * rules.straight_multiplier)
                    - i64::from(already_counted);

                if gain > best_gain {
                    best_gain = gain;
                    best = Some(StraightBonus {
                        values: sorted,
                        gain: gain as u32,
                    });
                }
            }
        }
    }

    best
}
