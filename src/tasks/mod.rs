//! Background tasks module
//!
//! This module contains the tick task that drives the meeting countdown.

pub mod tick_scheduler;

// Re-export main types
pub use tick_scheduler::{SchedulerState, TickScheduler, TICK_PERIOD};
