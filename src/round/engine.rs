//! The round engine proper.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::error::{RollRejection, SnapshotError};
use super::sequencing::{DieState, Sequencer};
use super::{RollOutcome, RoundSummary, UnlockLevel, Verdict};
use crate::core::{
    DiceRng, DiceRngState, Die, DieId, LevelRules, RoundConfig, DICE_PER_ROUND,
};
use crate::scoring::{self, Evaluation, ScoreBreakdown};

/// One attempt at a level.
///
/// All state is owned here and only changes through `request_roll`,
/// `roll_all` and `end_round`. Rejected requests leave the round exactly as
/// it was. Starting over means starting a new round.
#[derive(Clone, Debug)]
pub struct RoundEngine {
    config: RoundConfig,
    rules: LevelRules,
    dice: [Die; DICE_PER_ROUND],
    sequencer: Sequencer,
    rng: DiceRng,
    /// Highest level unlocked before this round started.
    unlocked_before: u32,
    raw_sum: u32,
    effective_score: u32,
    breakdown: ScoreBreakdown,
    rolls_count: u32,
    summary: Option<RoundSummary>,
}

impl RoundEngine {
    /// Start a round.
    ///
    /// `unlocked_level` is the highest level the player had unlocked before
    /// this round; a pass unlocks `max(unlocked_level, level + 1)`.
    #[must_use]
    pub fn new(config: RoundConfig, unlocked_level: u32) -> Self {
        let rng = match config.seed {
            Some(seed) => DiceRng::new(seed),
            None => DiceRng::from_entropy(),
        };
        let dice = config
            .faces
            .map(|sides| Die::with_budget(sides, config.roll_budget));

        let mut round = Self {
            rules: config.rules(),
            config,
            dice,
            sequencer: Sequencer::new(),
            rng,
            unlocked_before: unlocked_level.max(1),
            raw_sum: 0,
            effective_score: 0,
            breakdown: ScoreBreakdown::default(),
            rolls_count: 0,
            summary: None,
        };
        round.reset_dice();

        info!(
            level = round.config.level,
            target = round.rules.target_score,
            seed = round.rng.seed(),
            "round started"
        );
        round
    }

    // === Queries ===

    /// Configuration the round was started with.
    #[must_use]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Level being played.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.config.level
    }

    /// Multipliers and target for this level.
    #[must_use]
    pub fn rules(&self) -> &LevelRules {
        &self.rules
    }

    #[must_use]
    pub fn target_score(&self) -> u32 {
        self.rules.target_score
    }

    #[must_use]
    pub fn raw_sum(&self) -> u32 {
        self.raw_sum
    }

    #[must_use]
    pub fn effective_score(&self) -> u32 {
        self.effective_score
    }

    /// How the current effective score was reached.
    #[must_use]
    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }

    /// Successful rolls this round, across all dice.
    #[must_use]
    pub fn rolls_count(&self) -> u32 {
        self.rolls_count
    }

    /// The die under the cursor.
    #[must_use]
    pub fn active(&self) -> DieId {
        self.sequencer.active()
    }

    /// All four dice in rolling order.
    #[must_use]
    pub fn dice(&self) -> &[Die; DICE_PER_ROUND] {
        &self.dice
    }

    /// A die by slot.
    #[must_use]
    pub fn die(&self, id: DieId) -> Option<&Die> {
        self.dice.get(id.index())
    }

    /// Current values of the dice rolled so far, in slot order.
    #[must_use]
    pub fn values(&self) -> SmallVec<[u32; DICE_PER_ROUND]> {
        self.dice.iter().filter_map(Die::current_value).collect()
    }

    /// Derived state of one die. Every die is locked once the round is over.
    #[must_use]
    pub fn die_state(&self, id: DieId) -> DieState {
        match self.die(id) {
            Some(die) if !self.is_ended() => self.sequencer.state_of(id, die.rolls_left()),
            _ => DieState::Locked,
        }
    }

    /// Derived state of every die.
    #[must_use]
    pub fn die_states(&self) -> [DieState; DICE_PER_ROUND] {
        std::array::from_fn(|i| self.die_state(DieId(i as u8)))
    }

    /// Dice a roll request would currently be accepted for.
    #[must_use]
    pub fn rollable_dice(&self) -> Vec<DieId> {
        DieId::all(DICE_PER_ROUND)
            .filter(|&id| self.die_state(id).is_rollable())
            .collect()
    }

    /// Whether the round has ended, by submission or instant win.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.summary.is_some()
    }

    /// The final result, once the round has ended.
    #[must_use]
    pub fn verdict(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    // === Requests ===

    /// Roll the die at `index`.
    ///
    /// The die must be active or next, with rolls left. Rolling the next die
    /// moves the cursor onto it and locks every die before it.
    pub fn request_roll(&mut self, index: usize) -> Result<RollOutcome, RollRejection> {
        if self.is_ended() {
            return Err(RollRejection::RoundAlreadyEnded);
        }
        if index >= DICE_PER_ROUND {
            return Err(RollRejection::UnknownDie { index });
        }

        let id = DieId(index as u8);
        match self.die_state(id) {
            DieState::Active | DieState::NextAvailable => {}
            DieState::Exhausted => return Err(RollRejection::BudgetExhausted { die: id }),
            state @ DieState::Locked => {
                return Err(RollRejection::SequencingViolation { die: id, state })
            }
        }

        let value = self.dice[index]
            .roll(&mut self.rng)
            .map_err(|_| RollRejection::BudgetExhausted { die: id })?;
        self.rolls_count += 1;

        if self.sequencer.record_roll(id) {
            debug!(active = %id, "cursor advanced");
        }

        let verdict = self.rescore();
        debug!(
            die = %id,
            sides = self.dice[index].sides(),
            value,
            raw_sum = self.raw_sum,
            effective = self.effective_score,
            "die rolled"
        );

        Ok(RollOutcome {
            die: id,
            value,
            raw_sum: self.raw_sum,
            effective_score: self.effective_score,
            active: self.sequencer.active(),
            states: self.die_states(),
            verdict,
        })
    }

    /// Roll every remaining die to exhaustion, starting at the cursor.
    ///
    /// Each die is used up before moving on to the next one. Stops early if a
    /// roll wins the round outright.
    pub fn roll_all(&mut self) -> Result<Vec<RollOutcome>, RollRejection> {
        if self.is_ended() {
            return Err(RollRejection::RoundAlreadyEnded);
        }

        let mut outcomes = Vec::new();
        let start = self.active().index();
        'dice: for index in start..DICE_PER_ROUND {
            while self.dice[index].rolls_left() > 0 {
                let outcome = self.request_roll(index)?;
                let ended = outcome.ended_round();
                outcomes.push(outcome);
                if ended {
                    break 'dice;
                }
            }
        }

        Ok(outcomes)
    }

    /// Submit the round for a verdict.
    ///
    /// Only the first call has an effect; later calls are rejected and the
    /// original verdict stays available through [`RoundEngine::verdict`].
    pub fn end_round(&mut self) -> Result<RoundSummary, RollRejection> {
        if self.is_ended() {
            return Err(RollRejection::RoundAlreadyEnded);
        }

        let passed = self.effective_score >= self.rules.target_score;
        let summary = self.finish(passed, false);
        info!(
            level = summary.level,
            passed,
            effective = summary.effective_score,
            target = summary.target_score,
            "round submitted"
        );
        Ok(summary)
    }

    // === Snapshots ===

    /// Capture the round for later restore.
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            config: self.config.clone(),
            dice: self.dice.clone(),
            sequencer: self.sequencer,
            rng: self.rng.state(),
            unlocked_before: self.unlocked_before,
            rolls_count: self.rolls_count,
            summary: self.summary.clone(),
        }
    }

    /// Rebuild a round from a snapshot. Scores are recomputed from the dice.
    ///
    /// Dice are rebuilt from the configured faces and budget, so a snapshot
    /// whose history no longer fits them is rejected, as is a cursor outside
    /// the round or a die rolled ahead of it.
    pub fn restore(snapshot: RoundSnapshot) -> Result<Self, SnapshotError> {
        let active = snapshot.sequencer.active();
        if active.index() >= DICE_PER_ROUND {
            return Err(SnapshotError::CursorOutOfRange { active: active.0 });
        }

        let mut dice = snapshot.dice;
        for ((id, die), &sides) in DieId::all(DICE_PER_ROUND)
            .zip(dice.iter_mut())
            .zip(snapshot.config.faces.iter())
        {
            if id > active && !die.history().is_empty() {
                return Err(SnapshotError::RolledAheadOfCursor { die: id });
            }
            *die = Die::restore(sides, snapshot.config.roll_budget, die.history().iter().copied())
                .map_err(|source| SnapshotError::InvalidDie { die: id, source })?;
        }

        let mut round = Self {
            rules: snapshot.config.rules(),
            config: snapshot.config,
            dice,
            sequencer: Sequencer::with_active(active),
            rng: DiceRng::from_state(&snapshot.rng),
            unlocked_before: snapshot.unlocked_before.max(1),
            raw_sum: 0,
            effective_score: 0,
            breakdown: ScoreBreakdown::default(),
            rolls_count: snapshot.rolls_count,
            summary: snapshot.summary,
        };
        match &round.summary {
            Some(summary) => {
                round.raw_sum = summary.raw_sum;
                round.effective_score = summary.effective_score;
                if let Evaluation::Scored(breakdown) =
                    scoring::evaluate(&round.values(), &round.rules)
                {
                    round.breakdown = breakdown;
                }
            }
            None => {
                round.rescore();
            }
        }
        Ok(round)
    }

    // === Internals ===

    fn reset_dice(&mut self) {
        for die in &mut self.dice {
            die.reset();
        }
        self.sequencer = Sequencer::new();
        self.rolls_count = 0;
        self.rescore();
    }

    /// Recompute scores from the current values.
    ///
    /// On four equal values the effective score keeps its previous value and
    /// the round ends with a pass.
    fn rescore(&mut self) -> Verdict {
        let values = self.values();
        self.raw_sum = scoring::raw_sum(&values);

        match scoring::evaluate(&values, &self.rules) {
            Evaluation::Scored(breakdown) => {
                self.effective_score = breakdown.effective_score();
                self.breakdown = breakdown;
                Verdict::Continue
            }
            Evaluation::InstantWin { value } => {
                let summary = self.finish(true, true);
                info!(level = summary.level, value, "four of a kind, instant win");
                Verdict::InstantWin(summary)
            }
        }
    }

    fn finish(&mut self, passed: bool, instant_win: bool) -> RoundSummary {
        let next_level = self.config.level.saturating_add(1);
        let unlocks = passed.then(|| UnlockLevel(self.unlocked_before.max(next_level)));
        let summary = RoundSummary {
            level: self.config.level,
            passed,
            instant_win,
            effective_score: self.effective_score,
            target_score: self.rules.target_score,
            raw_sum: self.raw_sum,
            unlocks,
        };
        self.summary = Some(summary.clone());
        summary
    }
}

/// Serializable capture of an in-flight or finished round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub config: RoundConfig,
    pub dice: [Die; DICE_PER_ROUND],
    pub sequencer: Sequencer,
    pub rng: DiceRngState,
    pub unlocked_before: u32,
    pub rolls_count: u32,
    pub summary: Option<RoundSummary>,
}

impl RoundSnapshot {
    /// Compact binary encoding.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Decode a snapshot written by [`RoundSnapshot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}
