//! Error types raised by unlock stores.

use thiserror::Error;

/// Errors surfaced by [`UnlockStore`](super::UnlockStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unlock store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
