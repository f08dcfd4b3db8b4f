//! Level ladder progress.
//!
//! - `Progress`: which levels are playable, updated from round results
//! - `UnlockStore`: durable storage for progress (memory or JSON file)
//!
//! Levels 1 through [`MAX_LEVEL`] form the ladder. Clearing a level unlocks
//! the next one; unlocking is monotonic.

mod error;
mod store;

pub use error::{Result, StoreError};
pub use store::{FileUnlockStore, MemoryUnlockStore, ProgressRecord, UnlockStore};

use crate::core::MAX_LEVEL;
use crate::round::{RoundSummary, UnlockLevel};

/// In-memory view of ladder progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    record: ProgressRecord,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Fresh progress: only level 1 is playable.
    #[must_use]
    pub fn new() -> Self {
        Self {
            record: ProgressRecord::default(),
        }
    }

    /// Progress from a stored record.
    #[must_use]
    pub fn from_record(record: ProgressRecord) -> Self {
        Self {
            record: record.normalized(),
        }
    }

    /// The record to persist.
    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// Highest playable level.
    #[must_use]
    pub fn unlocked_level(&self) -> u32 {
        self.record.unlocked_level
    }

    /// Reward claimed after the most recent pass.
    #[must_use]
    pub fn last_reward(&self) -> Option<&str> {
        self.record.last_reward.as_deref()
    }

    #[must_use]
    pub fn is_unlocked(&self, level: u32) -> bool {
        level >= 1 && level <= self.record.unlocked_level
    }

    /// The ladder as `(level, unlocked)` pairs.
    pub fn ladder(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        (1..=MAX_LEVEL).map(move |level| (level, self.is_unlocked(level)))
    }

    /// Merge an unlock fact. Returns `true` if progress moved.
    pub fn unlock(&mut self, unlock: UnlockLevel) -> bool {
        if unlock.0 > self.record.unlocked_level {
            self.record.unlocked_level = unlock.0;
            true
        } else {
            false
        }
    }

    /// Merge the unlock carried by a round result, if any.
    pub fn apply(&mut self, summary: &RoundSummary) -> bool {
        summary.unlocks.is_some_and(|unlock| self.unlock(unlock))
    }

    /// Record the reward picked after a pass and make sure `next_level` is open.
    pub fn claim_reward(&mut self, reward: impl Into<String>, next_level: u32) {
        self.record.last_reward = Some(reward.into());
        self.unlock(UnlockLevel(next_level));
    }
}
