//! Error types shared across the timer

use thiserror::Error;

/// Errors raised by the meeting timer core and its collaborators
#[derive(Debug, Error)]
pub enum TimerError {
    /// Session cannot be created from the given settings or snapshot
    #[error("invalid session configuration: {0}")]
    Configuration(String),

    /// Advancing past the last participant
    #[error("cannot advance participant: {completed}/{total} already completed")]
    InvalidTransition { completed: u32, total: u32 },

    #[error("meeting state lock poisoned")]
    StatePoisoned,

    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("wake lock unavailable: {0}")]
    WakeLock(String),
}

pub type Result<T> = std::result::Result<T, TimerError>;
