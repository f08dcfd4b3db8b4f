//! Level rules and round configuration.
//!
//! - `LevelRules`: multiplier table and target score for one level
//! - `RoundConfig`: everything needed to start a round (level, dice, budget, seed)
//!
//! The level table is static data; scoring code never branches on the
//! level number directly.

use serde::{Deserialize, Serialize};

use super::die::DEFAULT_ROLL_BUDGET;

/// Highest level on the ladder.
pub const MAX_LEVEL: u32 = 6;

/// Number of dice in a round.
pub const DICE_PER_ROUND: usize = 4;

/// Face counts of the four dice, in rolling order.
pub const DEFAULT_FACES: [u32; DICE_PER_ROUND] = [4, 6, 8, 12];

/// Multipliers and target for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRules {
    /// Applied to each value of a pair (or any group of 2+ not covered by the triplet rule).
    pub pair_multiplier: u32,
    /// Applied to the sum of a 3-value straight. `1` disables straights.
    pub straight_multiplier: u32,
    /// Applied to each value of a triplet. `None` disables the rule.
    pub triplet_multiplier: Option<u32>,
    /// Effective score needed to pass.
    pub target_score: u32,
}

impl LevelRules {
    /// Rules used for levels outside the table.
    pub const FALLBACK: LevelRules = LevelRules::new(2, 1, None, 26);

    const TABLE: [LevelRules; MAX_LEVEL as usize] = [
        LevelRules::new(2, 1, None, 20),
        LevelRules::new(2, 3, None, 30),
        LevelRules::new(2, 3, Some(3), 40),
        LevelRules::new(4, 3, Some(3), 50),
        LevelRules::new(4, 5, Some(3), 60),
        LevelRules::new(4, 5, Some(4), 100),
    ];

    /// Create a rule set.
    #[must_use]
    pub const fn new(
        pair_multiplier: u32,
        straight_multiplier: u32,
        triplet_multiplier: Option<u32>,
        target_score: u32,
    ) -> Self {
        Self {
            pair_multiplier,
            straight_multiplier,
            triplet_multiplier,
            target_score,
        }
    }

    /// Look up the rules for a level, falling back for unknown levels.
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        level
            .checked_sub(1)
            .and_then(|i| Self::TABLE.get(i as usize))
            .copied()
            .unwrap_or(Self::FALLBACK)
    }

    /// Whether straights can pay out at this level.
    #[must_use]
    pub fn straights_enabled(&self) -> bool {
        self.straight_multiplier > 1
    }
}

/// Configuration for a single round.
///
/// ```
/// use dice_ladder::core::RoundConfig;
///
/// let config = RoundConfig::new(3).with_roll_budget(4).with_seed(99);
/// assert_eq!(config.rules().target_score, 40);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Level being played (1-based).
    pub level: u32,

    /// Rolls each die allows.
    #[serde(default = "default_roll_budget")]
    pub roll_budget: u32,

    /// Face counts of the four dice, in rolling order.
    #[serde(default = "default_faces")]
    pub faces: [u32; DICE_PER_ROUND],

    /// RNG seed. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_roll_budget() -> u32 {
    DEFAULT_ROLL_BUDGET
}

fn default_faces() -> [u32; DICE_PER_ROUND] {
    DEFAULT_FACES
}

impl RoundConfig {
    /// Create a configuration for `level` with default dice.
    pub fn new(level: u32) -> Self {
        assert!(level >= 1, "Levels start at 1");

        Self {
            level,
            roll_budget: DEFAULT_ROLL_BUDGET,
            faces: DEFAULT_FACES,
            seed: None,
        }
    }

    /// Set the per-die roll budget.
    #[must_use]
    pub fn with_roll_budget(mut self, budget: u32) -> Self {
        self.roll_budget = budget;
        self
    }

    /// Set the face counts of the four dice.
    #[must_use]
    pub fn with_faces(mut self, faces: [u32; DICE_PER_ROUND]) -> Self {
        assert!(faces.iter().all(|&s| s >= 2), "Every die needs at least 2 sides");
        self.faces = faces;
        self
    }

    /// Fix the RNG seed for reproducible rounds.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rules for the configured level.
    #[must_use]
    pub fn rules(&self) -> LevelRules {
        LevelRules::for_level(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table() {
        let expected = [
            (1, 2, 1, None, 20),
            (2, 2, 3, None, 30),
            (3, 2, 3, Some(3), 40),
            (4, 4, 3, Some(3), 50),
            (5, 4, 5, Some(3), 60),
            (6, 4, 5, Some(4), 100),
        ];

        for (level, pair, straight, triplet, target) in expected {
            let rules = LevelRules::for_level(level);
            assert_eq!(rules.pair_multiplier, pair, "level {}", level);
            assert_eq!(rules.straight_multiplier, straight, "level {}", level);
            assert_eq!(rules.triplet_multiplier, triplet, "level {}", level);
            assert_eq!(rules.target_score, target, "level {}", level);
        }
    }

    #[test]
    fn test_unknown_levels_fall_back() {
        for level in [0, 7, 42, u32::MAX] {
            assert_eq!(LevelRules::for_level(level), LevelRules::FALLBACK);
        }
        assert_eq!(LevelRules::FALLBACK.target_score, 26);
        assert!(!LevelRules::FALLBACK.straights_enabled());
    }

    #[test]
    fn test_straights_enabled() {
        assert!(!LevelRules::for_level(1).straights_enabled());
        assert!(LevelRules::for_level(2).straights_enabled());
    }

    #[test]
    fn test_round_config_builder() {
        let config = RoundConfig::new(2)
            .with_roll_budget(3)
            .with_faces([6, 6, 6, 6])
            .with_seed(7);

        assert_eq!(config.level, 2);
        assert_eq!(config.roll_budget, 3);
        assert_eq!(config.faces, [6, 6, 6, 6]);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.rules().target_score, 30);
    }

    #[test]
    fn test_round_config_defaults_from_json() {
        let config: RoundConfig = serde_json::from_str(r#"{ "level": 4 }"#).unwrap();
        assert_eq!(config, RoundConfig::new(4));
        assert_eq!(config.faces, DEFAULT_FACES);
        assert_eq!(config.roll_budget, DEFAULT_ROLL_BUDGET);
    }

    #[test]
    #[should_panic(expected = "Levels start at 1")]
    fn test_level_zero_rejected() {
        RoundConfig::new(0);
    }
}
