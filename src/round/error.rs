//! Reasons a request or a snapshot is turned down.

use thiserror::Error;

use super::sequencing::DieState;
use crate::core::{DieError, DieId};

/// A rejected request. The round is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RollRejection {
    #[error("no die at index {index}")]
    UnknownDie { index: usize },

    #[error("{die} is {state:?} and cannot be rolled now")]
    SequencingViolation { die: DieId, state: DieState },

    #[error("{die} has no rolls left")]
    BudgetExhausted { die: DieId },

    #[error("round has already ended")]
    RoundAlreadyEnded,
}

/// A snapshot that does not describe a reachable round.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("cursor at slot {active} is outside the round")]
    CursorOutOfRange { active: u8 },

    #[error("{die} was rolled ahead of the cursor")]
    RolledAheadOfCursor { die: DieId },

    #[error("{die}: {source}")]
    InvalidDie {
        die: DieId,
        #[source]
        source: DieError,
    },
}
