//! Standup Timer - pace a meeting by splitting it between its participants
//!
//! This library tracks a per-participant countdown alongside the overall
//! meeting countdown, emits warning and finished cues, and saves the
//! counters when a session is interrupted so it can be resumed later.

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod format;
pub mod services;
pub mod session;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use controller::{run_session, SessionExit};
pub use error::{Result, TimerError};
pub use session::{Session, SessionSettings};
pub use state::{MeetingState, SessionState};
pub use utils::signals::shutdown_signal;
