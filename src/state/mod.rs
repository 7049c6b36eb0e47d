//! State management module
//!
//! This module contains the meeting counters, their persisted snapshot and
//! the locked session handle shared between the ticker and user actions.

pub mod meeting_state;
pub mod session_state;
pub mod snapshot;

// Re-export main types
pub use meeting_state::{AdvanceOutcome, Cue, MeetingState, TickOutcome};
pub use session_state::SessionState;
pub use snapshot::Snapshot;
