//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::session::SessionSettings;

/// Meeting lengths in minutes, indexed by the length selection
const MEETING_LENGTH_MINUTES: [u32; 4] = [5, 10, 15, 20];

/// Total meeting length in seconds for a length selection; unknown selections give 0
pub fn meeting_length_seconds(selection: u32) -> u32 {
    MEETING_LENGTH_MINUTES
        .get(selection as usize)
        .map_or(0, |minutes| minutes * 60)
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "standup-timer")]
#[command(about = "Split a standup meeting fairly between its participants")]
#[command(version)]
pub struct Config {
    /// Meeting length: 0 = 5 min, 1 = 10 min, 2 = 15 min, 3 = 20 min
    #[arg(short, long, default_value = "0")]
    pub length: u32,

    /// Number of participants
    #[arg(short, long)]
    pub participants: u32,

    /// Seconds remaining at which the warning cue plays
    #[arg(short, long, default_value = "15")]
    pub warning_time: u32,

    /// Do not play any cues
    #[arg(long)]
    pub no_sounds: bool,

    /// Sound file played at the warning threshold
    #[arg(long)]
    pub warning_sound: Option<PathBuf>,

    /// Sound file played when a participant runs out of time
    #[arg(long)]
    pub finished_sound: Option<PathBuf>,

    /// Command used to play sound files
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Where an interrupted meeting is saved
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Discard any saved meeting and start over
    #[arg(long)]
    pub fresh: bool,

    /// Do not keep the display awake
    #[arg(long)]
    pub no_wake_lock: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Total meeting length in seconds
    pub fn meeting_seconds(&self) -> u32 {
        meeting_length_seconds(self.length)
    }

    /// Settings for a new session
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            total_participants: self.participants,
            meeting_seconds: self.meeting_seconds(),
            warning_time: self.warning_time,
            sounds_enabled: !self.no_sounds,
        }
    }

    /// Snapshot file location
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(crate::services::default_state_path)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
