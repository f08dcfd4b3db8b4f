//! Unlock persistence contracts and implementations.
//!
//! The round engine never touches storage. It emits [`UnlockLevel`] facts
//! and a store merges them as `max(stored, N)`, so replays and stale facts
//! can never lower progress.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{Result, StoreError};
use crate::round::UnlockLevel;

/// Persisted ladder progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Highest playable level. Never below 1.
    #[serde(default = "first_level")]
    pub unlocked_level: u32,

    /// Reward claimed after the most recent pass.
    #[serde(default)]
    pub last_reward: Option<String>,
}

fn first_level() -> u32 {
    1
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            unlocked_level: first_level(),
            last_reward: None,
        }
    }
}

impl ProgressRecord {
    /// Clamp values a hand-edited or older file might carry.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.unlocked_level = self.unlocked_level.max(1);
        self
    }
}

/// Durable storage for ladder progress.
pub trait UnlockStore: Send + Sync {
    /// Load the stored record, or the default when nothing was stored yet.
    fn load(&self) -> Result<ProgressRecord>;

    /// Replace the stored record.
    fn save(&self, record: &ProgressRecord) -> Result<()>;

    /// Merge an unlock fact, keeping the higher level.
    ///
    /// Returns the unlocked level after the merge.
    fn merge_unlock(&self, unlock: UnlockLevel) -> Result<u32> {
        let mut record = self.load()?;
        if unlock.0 > record.unlocked_level {
            record.unlocked_level = unlock.0;
            self.save(&record)?;
        }
        Ok(record.unlocked_level)
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryUnlockStore {
    record: Mutex<ProgressRecord>,
}

impl MemoryUnlockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with pre-loaded progress.
    pub fn with_record(record: ProgressRecord) -> Self {
        Self {
            record: Mutex::new(record.normalized()),
        }
    }
}

impl UnlockStore for MemoryUnlockStore {
    fn load(&self) -> Result<ProgressRecord> {
        let record = self.record.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(record.clone())
    }

    fn save(&self, record: &ProgressRecord) -> Result<()> {
        let mut stored = self.record.lock().map_err(|_| StoreError::LockPoisoned)?;
        *stored = record.clone().normalized();
        Ok(())
    }
}

/// JSON file store.
///
/// ```text
/// {
///   "unlocked_level": 3,
///   "last_reward": "reward1"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileUnlockStore {
    path: PathBuf,
}

impl FileUnlockStore {
    /// Use `path` as the progress file. It is created on first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the progress file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UnlockStore for FileUnlockStore {
    fn load(&self) -> Result<ProgressRecord> {
        if !self.path.exists() {
            return Ok(ProgressRecord::default());
        }

        let json = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<ProgressRecord>(&json) {
            Ok(record) => Ok(record.normalized()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable progress file, starting fresh");
                Ok(ProgressRecord::default())
            }
        }
    }

    fn save(&self, record: &ProgressRecord) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let json = serde_json::to_string_pretty(&record.clone().normalized())?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), unlocked = record.unlocked_level, "progress saved");
        Ok(())
    }
}
