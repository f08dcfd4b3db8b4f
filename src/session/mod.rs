//! Session: rounds played against persisted ladder progress.
//!
//! A session wires a [`RoundEngine`] to an [`UnlockStore`]:
//! - only unlocked levels can be started
//! - passes (by score or instant win) are merged into the store; a failed
//!   write never loses the round result and is kept for `take_store_error`
//! - after a round, `retry` replays the level and `next_round` moves on
//!
//! ## Example
//!
//! ```
//! use dice_ladder::progress::MemoryUnlockStore;
//! use dice_ladder::session::{Session, SessionError};
//!
//! let mut session = Session::open(MemoryUnlockStore::new()).unwrap().with_seed(1);
//! assert!(matches!(session.start_round(2), Err(SessionError::LevelLocked { .. })));
//!
//! session.start_round(1).unwrap();
//! session.request_roll(0).unwrap();
//! let summary = session.end_round().unwrap();
//! assert_eq!(summary.level, 1);
//! ```

use thiserror::Error;
use tracing::{info, warn};

use crate::core::RoundConfig;
use crate::progress::{Progress, StoreError, UnlockStore};
use crate::round::{RollOutcome, RollRejection, RoundEngine, RoundSummary, UnlockLevel, Verdict};

/// Errors from session-level requests.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("level {level} is locked (unlocked up to {unlocked})")]
    LevelLocked { level: u32, unlocked: u32 },

    #[error("no round in progress")]
    NoRound,

    #[error("level {level} was not cleared")]
    NotPassed { level: u32 },

    #[error(transparent)]
    Rejected(#[from] RollRejection),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Rounds played against stored progress.
pub struct Session<S: UnlockStore> {
    store: S,
    progress: Progress,
    template: RoundConfig,
    seed: Option<u64>,
    rounds_started: u64,
    round: Option<RoundEngine>,
    store_error: Option<StoreError>,
}

impl<S: UnlockStore> Session<S> {
    /// Open a session, loading progress from `store`.
    pub fn open(store: S) -> Result<Self> {
        let progress = Progress::from_record(store.load()?);
        info!(unlocked = progress.unlocked_level(), "session opened");
        Ok(Self {
            store,
            progress,
            template: RoundConfig::new(1),
            seed: None,
            rounds_started: 0,
            round: None,
            store_error: None,
        })
    }

    /// Seed every round from `seed`, for reproducible sessions.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use `template` for dice and budget. Its level and seed are ignored.
    #[must_use]
    pub fn with_round_template(mut self, template: RoundConfig) -> Self {
        self.template = template;
        self
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current (or last finished) round.
    #[must_use]
    pub fn round(&self) -> Option<&RoundEngine> {
        self.round.as_ref()
    }

    /// The last unlock that could not be written to the store, if any.
    ///
    /// The unlock still holds for this session. Clears the stored error.
    pub fn take_store_error(&mut self) -> Option<StoreError> {
        self.store_error.take()
    }

    /// Start a round at an unlocked level, discarding any current round.
    pub fn start_round(&mut self, level: u32) -> Result<&RoundEngine> {
        if !self.progress.is_unlocked(level) {
            return Err(SessionError::LevelLocked {
                level,
                unlocked: self.progress.unlocked_level(),
            });
        }

        let mut config = self.template.clone();
        config.level = level;
        config.seed = self
            .seed
            .map(|seed| seed.wrapping_add(self.rounds_started.wrapping_mul(0x9E3779B97F4A7C15)));
        self.rounds_started += 1;

        let round = RoundEngine::new(config, self.progress.unlocked_level());
        Ok(&*self.round.insert(round))
    }

    /// Start over at the level of the last round.
    pub fn retry(&mut self) -> Result<&RoundEngine> {
        let level = self.current()?.level();
        self.start_round(level)
    }

    /// Move on to the level after the last round, which must have passed.
    pub fn next_round(&mut self) -> Result<&RoundEngine> {
        let level = self.passed_level()?;
        self.start_round(level.saturating_add(1))
    }

    /// Roll a die in the current round. Instant wins are persisted.
    pub fn request_roll(&mut self, index: usize) -> Result<RollOutcome> {
        let outcome = self.current_mut()?.request_roll(index)?;
        if let Verdict::InstantWin(summary) = &outcome.verdict {
            self.persist(summary.unlocks);
        }
        Ok(outcome)
    }

    /// Roll every remaining die in the current round.
    pub fn roll_all(&mut self) -> Result<Vec<RollOutcome>> {
        let outcomes = self.current_mut()?.roll_all()?;
        if let Some(Verdict::InstantWin(summary)) = outcomes.last().map(|o| &o.verdict) {
            self.persist(summary.unlocks);
        }
        Ok(outcomes)
    }

    /// Submit the current round. Passes are persisted.
    pub fn end_round(&mut self) -> Result<RoundSummary> {
        let summary = self.current_mut()?.end_round()?;
        self.persist(summary.unlocks);
        Ok(summary)
    }

    /// Record the reward chosen after a pass. Returns the level to play next.
    pub fn claim_reward(&mut self, reward: impl Into<String>) -> Result<u32> {
        let next_level = self.passed_level()?.saturating_add(1);
        let mut record = self.store.load()?;
        record.last_reward = Some(reward.into());
        record.unlocked_level = record.unlocked_level.max(next_level);
        self.store.save(&record)?;
        self.progress = Progress::from_record(record);
        Ok(next_level)
    }

    fn current(&self) -> Result<&RoundEngine> {
        self.round.as_ref().ok_or(SessionError::NoRound)
    }

    fn current_mut(&mut self) -> Result<&mut RoundEngine> {
        self.round.as_mut().ok_or(SessionError::NoRound)
    }

    fn passed_level(&self) -> Result<u32> {
        let round = self.current()?;
        match round.verdict() {
            Some(summary) if summary.passed => Ok(summary.level),
            _ => Err(SessionError::NotPassed {
                level: round.level(),
            }),
        }
    }

    fn persist(&mut self, unlock: Option<UnlockLevel>) {
        let Some(unlock) = unlock else {
            return;
        };

        match self.store.merge_unlock(unlock) {
            Ok(level) => {
                self.progress.unlock(UnlockLevel(level));
                info!(unlocked = level, "level unlocked");
            }
            Err(e) => {
                self.progress.unlock(unlock);
                warn!(error = %e, level = unlock.0, "failed to persist unlock");
                self.store_error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::core::{Die, DieId, RollRecord};
    use crate::progress::{MemoryUnlockStore, ProgressRecord};
    use crate::round::Sequencer;

    /// Reads as fresh progress and refuses every write.
    struct ReadOnlyStore;

    impl UnlockStore for ReadOnlyStore {
        fn load(&self) -> crate::progress::Result<ProgressRecord> {
            Ok(ProgressRecord::default())
        }

        fn save(&self, _record: &ProgressRecord) -> crate::progress::Result<()> {
            Err(StoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    /// A round on `sides`-sided dice whose first slots already show `values`.
    fn restored_round(level: u32, sides: u32, values: &[u32], seed: u64) -> RoundEngine {
        let config = RoundConfig::new(level).with_faces([sides; 4]).with_seed(seed);
        let mut snapshot = RoundEngine::new(config, 1).snapshot();
        for (die, &value) in snapshot.dice.iter_mut().zip(values) {
            let rolled = RollRecord { value, timestamp_ms: 0 };
            *die = Die::restore(sides, snapshot.config.roll_budget, [rolled]).unwrap();
        }
        snapshot.sequencer = Sequencer::with_active(DieId(values.len() as u8 - 1));
        RoundEngine::restore(snapshot).unwrap()
    }

    fn session_at(unlocked: u32) -> Session<MemoryUnlockStore> {
        let store = MemoryUnlockStore::with_record(ProgressRecord {
            unlocked_level: unlocked,
            last_reward: None,
        });
        Session::open(store).unwrap().with_seed(11)
    }

    #[test]
    fn test_locked_level_rejected() {
        let mut session = session_at(2);
        assert!(session.start_round(2).is_ok());
        assert!(matches!(
            session.start_round(3),
            Err(SessionError::LevelLocked { level: 3, unlocked: 2 })
        ));
    }

    #[test]
    fn test_requests_need_a_round() {
        let mut session = session_at(1);
        assert!(matches!(session.request_roll(0), Err(SessionError::NoRound)));
        assert!(matches!(session.end_round(), Err(SessionError::NoRound)));
        assert!(matches!(session.retry(), Err(SessionError::NoRound)));
    }

    #[test]
    fn test_failed_round_blocks_next() {
        let mut session = session_at(1);
        session.start_round(1).unwrap();
        session.request_roll(0).unwrap();
        let summary = session.end_round().unwrap();
        assert!(!summary.passed);

        assert!(matches!(
            session.next_round(),
            Err(SessionError::NotPassed { level: 1 })
        ));
        assert!(matches!(session.claim_reward("reward1"), Err(SessionError::NotPassed { .. })));
        assert_eq!(session.store().load().unwrap().unlocked_level, 1);

        let retried = session.retry().unwrap();
        assert_eq!(retried.level(), 1);
        assert!(!retried.is_ended());
    }

    #[test]
    fn test_rejections_pass_through() {
        let mut session = session_at(1);
        session.start_round(1).unwrap();
        assert!(matches!(
            session.request_roll(3),
            Err(SessionError::Rejected(RollRejection::SequencingViolation { .. }))
        ));
    }

    #[test]
    fn test_pass_is_persisted_and_unlocks_next() {
        // Level 1 with generous dice: a full roll-out of four d100s clears 20.
        let mut session = session_at(1).with_round_template(
            RoundConfig::new(1).with_faces([100, 100, 100, 100]).with_roll_budget(1),
        );
        session.start_round(1).unwrap();
        let outcomes = session.roll_all().unwrap();
        let passed = match outcomes.last().map(|o| &o.verdict) {
            Some(Verdict::InstantWin(summary)) => summary.passed,
            _ => session.end_round().unwrap().passed,
        };
        assert!(passed, "seed 11 must clear level 1 on four d100s");

        assert_eq!(session.store().load().unwrap().unlocked_level, 2);
        assert!(session.progress().is_unlocked(2));

        assert_eq!(session.claim_reward("reward1").unwrap(), 2);
        assert_eq!(
            session.store().load().unwrap().last_reward.as_deref(),
            Some("reward1")
        );

        let next = session.next_round().unwrap();
        assert_eq!(next.level(), 2);
    }

    #[test]
    fn test_failed_write_keeps_instant_win() {
        let mut session = Session::open(ReadOnlyStore).unwrap();
        let mut won = false;

        for seed in 0..64 {
            session.round = Some(restored_round(1, 2, &[1, 1, 1], seed));
            let outcome = session.request_roll(3).unwrap();
            if !outcome.ended_round() {
                assert!(session.take_store_error().is_none());
                continue;
            }

            won = true;
            assert_eq!(outcome.value, 1);
            assert!(matches!(outcome.verdict, Verdict::InstantWin(ref s) if s.passed));
            assert!(matches!(session.take_store_error(), Some(StoreError::Io(_))));
            assert!(session.take_store_error().is_none());
            assert!(session.progress().is_unlocked(2));
            assert_eq!(session.store().load().unwrap().unlocked_level, 1);
            break;
        }

        assert!(won, "no seed rolled the fourth 1");
    }

    #[test]
    fn test_failed_write_keeps_submitted_summary() {
        let mut session = Session::open(ReadOnlyStore).unwrap();
        session.round = Some(restored_round(1, 12, &[3, 3, 5, 7], 0));

        let summary = session.end_round().unwrap();
        assert!(summary.passed);
        assert_eq!(summary.effective_score, 24);
        assert!(matches!(session.take_store_error(), Some(StoreError::Io(_))));
        assert!(session.progress().is_unlocked(2));
        assert_eq!(session.next_round().unwrap().level(), 2);
    }

    #[test]
    fn test_top_level_pass_saturates() {
        let mut session = session_at(u32::MAX);
        session.round = Some(restored_round(u32::MAX, 12, &[12, 12, 11, 10], 0));

        let summary = session.end_round().unwrap();
        assert!(summary.passed);
        assert_eq!(summary.unlocks, Some(UnlockLevel(u32::MAX)));
        assert!(session.take_store_error().is_none());

        assert_eq!(session.claim_reward("reward1").unwrap(), u32::MAX);
        assert_eq!(session.next_round().unwrap().level(), u32::MAX);
    }
}
