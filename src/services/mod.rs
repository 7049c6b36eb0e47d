//! External collaborators module
//!
//! This module contains the narrow interfaces the timer talks to: snapshot
//! storage, the stay-awake lock and cue playback.

pub mod cues;
pub mod persistence;
pub mod wake_lock;

// Re-export main types
pub use cues::{CommandCuePlayer, CuePlayer};
pub use persistence::{
    default_state_path, load_or_default, JsonFileStore, MemoryStore, SnapshotStore,
};
pub use wake_lock::{check_inhibitor_available, InhibitorLock, NoopWakeLock, WakeLock};
