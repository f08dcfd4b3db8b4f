//! Scoring integration tests.
//!
//! These tests pin the level table against worked examples and check the
//! properties every scoring pass must hold.

use dice_ladder::core::LevelRules;
use dice_ladder::scoring::{evaluate, raw_sum, Evaluation};
use proptest::prelude::*;

fn effective(values: &[u32], level: u32) -> u32 {
    evaluate(values, &LevelRules::for_level(level))
        .effective_score()
        .expect("not an instant win")
}

// =============================================================================
// Worked Examples
// =============================================================================

/// Level 1: a pair of 3s doubles, singles count once.
#[test]
fn test_pair_at_level_one_passes() {
    let values = [3, 3, 5, 7];
    assert_eq!(effective(&values, 1), 24);
    assert_eq!(raw_sum(&values), 18);
    assert!(effective(&values, 1) >= LevelRules::for_level(1).target_score);
}

/// Level 2: the straight 2-3-4 triples its sum.
#[test]
fn test_straight_at_level_two_passes() {
    let values = [2, 3, 4, 6];
    assert_eq!(effective(&values, 2), 33);
    assert!(effective(&values, 2) >= LevelRules::for_level(2).target_score);
}

/// Level 3: a triplet of 5s pays 5 * 3 * 3.
#[test]
fn test_triplet_at_level_three_passes() {
    let values = [5, 5, 5, 9];
    assert_eq!(effective(&values, 3), 54);
    assert!(effective(&values, 3) >= LevelRules::for_level(3).target_score);
}

/// Four of a kind wins at every level, including unknown ones.
#[test]
fn test_four_of_a_kind_everywhere() {
    for level in 0..=10 {
        assert!(evaluate(&[4, 4, 4, 4], &LevelRules::for_level(level)).is_instant_win());
    }
}

/// Level 1 has no straight bonus, so 1-2-3-4 is just 10.
#[test]
fn test_level_one_ignores_straights() {
    let values = [1, 2, 3, 4];
    assert_eq!(effective(&values, 1), 10);
    assert!(effective(&values, 1) < LevelRules::for_level(1).target_score);
}

/// Unknown levels score like level 1 but aim for 26.
#[test]
fn test_fallback_level() {
    let rules = LevelRules::for_level(9);
    assert_eq!(rules.target_score, 26);
    assert_eq!(effective(&[3, 3, 5, 7], 9), 24);
}

/// Level 6 stacks a pair with the best straight.
#[test]
fn test_level_six_pair_and_straight() {
    // Pair of 7s: 7*2*4 = 56, singles 6 + 8 -> base 70.
    // Straight {6,7,8}: 21*5 - (6 + 28 + 8) = 63.
    assert_eq!(effective(&[6, 7, 7, 8], 6), 133);
}

/// The breakdown explains the number it produces.
#[test]
fn test_breakdown_matches_score() {
    let Evaluation::Scored(breakdown) = evaluate(&[2, 3, 4, 6], &LevelRules::for_level(2)) else {
        panic!("expected a scored hand");
    };
    assert_eq!(breakdown.groups.len(), 4);
    assert!(breakdown.groups.iter().all(|g| g.count == 1 && g.multiplier == 1));
    assert_eq!(breakdown.base() + breakdown.straight.unwrap().gain, 33);
}

// =============================================================================
// Properties
// =============================================================================

fn hand() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=12, 0..=4)
}

proptest! {
    /// Scoring is a function of the multiset, not of roll order.
    #[test]
    fn prop_order_independent(values in hand(), level in 1u32..=7, seed in any::<u64>()) {
        let rules = LevelRules::for_level(level);
        let mut shuffled = values.clone();
        let len = shuffled.len();
        if len > 1 {
            shuffled.rotate_left((seed % len as u64) as usize);
            if seed & 1 == 1 {
                shuffled.reverse();
            }
        }
        prop_assert_eq!(
            evaluate(&values, &rules).effective_score(),
            evaluate(&shuffled, &rules).effective_score()
        );
    }

    /// Any hand with four equal values is an instant win.
    #[test]
    fn prop_quad_always_wins(value in 1u32..=12, level in 0u32..=10) {
        let eval = evaluate(&[value; 4], &LevelRules::for_level(level));
        prop_assert_eq!(eval, Evaluation::InstantWin { value });
    }

    /// Multipliers only ever add: the effective score never falls below the raw sum.
    #[test]
    fn prop_effective_at_least_raw(values in hand(), level in 1u32..=7) {
        if let Some(score) = evaluate(&values, &LevelRules::for_level(level)).effective_score() {
            prop_assert!(score >= raw_sum(&values));
        }
    }

    /// Evaluating twice gives the same answer.
    #[test]
    fn prop_deterministic(values in hand(), level in 1u32..=7) {
        let rules = LevelRules::for_level(level);
        prop_assert_eq!(evaluate(&values, &rules), evaluate(&values, &rules));
    }
}
