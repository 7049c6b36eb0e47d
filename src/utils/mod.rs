//! Utility functions module
//!
//! Process-level helpers used by the binary.

pub mod input;
pub mod signals;

pub use input::spawn_stdin_reader;
pub use signals::shutdown_signal;
