//! Meeting countdown state and its transitions

use tracing::debug;

use super::Snapshot;
use crate::error::{Result, TimerError};

/// Audible signal requested by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// The current participant reached the warning threshold
    Warning,
    /// The current participant ran out of time
    Finished,
}

/// Counters after a tick, plus any cue the tick emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining_individual_seconds: u32,
    pub remaining_meeting_seconds: u32,
    pub cue: Option<Cue>,
}

/// Result of handing the floor to the next participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Another participant is up, with this much time on the clock
    NextParticipant { number: u32, seconds: u32 },
    /// Everybody has spoken; the individual countdown is disabled
    PhaseComplete,
}

/// Countdown counters for one meeting session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingState {
    remaining_individual_seconds: u32,
    remaining_meeting_seconds: u32,
    starting_individual_seconds: u32,
    completed_participants: u32,
    total_participants: u32,
    warning_time: u32,
    finished: bool,
}

impl MeetingState {
    /// Build a session from fresh settings, or from a snapshot when one is given.
    ///
    /// Snapshot counters win over computed defaults; each absent counter
    /// falls back to the default derived from the counters before it.
    pub fn initialize(
        total_participants: u32,
        initial_meeting_seconds: u32,
        warning_time: u32,
        snapshot: Option<&Snapshot>,
    ) -> Result<Self> {
        let snapshot = snapshot.cloned().unwrap_or_default();

        let total_participants = snapshot.total_participants.unwrap_or(total_participants);
        if total_participants < 1 {
            return Err(TimerError::Configuration(
                "a meeting needs at least one participant".to_string(),
            ));
        }

        let remaining_meeting_seconds = snapshot
            .remaining_meeting_seconds
            .unwrap_or(initial_meeting_seconds);
        let starting_individual_seconds = snapshot
            .starting_individual_seconds
            .unwrap_or(remaining_meeting_seconds / total_participants);
        let mut remaining_individual_seconds = snapshot
            .remaining_individual_seconds
            .unwrap_or(starting_individual_seconds);
        let completed_participants = snapshot.completed_participants.unwrap_or(0);

        if completed_participants > total_participants {
            return Err(TimerError::Configuration(format!(
                "snapshot records {} completed participants out of {}",
                completed_participants, total_participants
            )));
        }
        if completed_participants == total_participants {
            remaining_individual_seconds = 0;
        }

        Ok(Self {
            remaining_individual_seconds,
            remaining_meeting_seconds,
            starting_individual_seconds,
            completed_participants,
            total_participants,
            warning_time,
            finished: false,
        })
    }

    /// Advance both countdowns by one second.
    ///
    /// The warning cue fires only when the individual countdown lands exactly
    /// on the warning threshold, so a turn that starts below it never warns.
    pub fn tick(&mut self) -> TickOutcome {
        let mut cue = None;

        if !self.finished {
            if self.is_individual_phase_active() && self.remaining_individual_seconds > 0 {
                self.remaining_individual_seconds -= 1;

                if self.remaining_individual_seconds == self.warning_time {
                    cue = Some(Cue::Warning);
                } else if self.remaining_individual_seconds == 0 {
                    cue = Some(Cue::Finished);
                }
            }

            if self.remaining_meeting_seconds > 0 {
                self.remaining_meeting_seconds -= 1;
            }
        }

        if let Some(cue) = cue {
            debug!("Tick emitted {:?} cue", cue);
        }

        TickOutcome {
            remaining_individual_seconds: self.remaining_individual_seconds,
            remaining_meeting_seconds: self.remaining_meeting_seconds,
            cue,
        }
    }

    /// Hand the floor to the next participant
    pub fn advance_participant(&mut self) -> Result<AdvanceOutcome> {
        if !self.is_individual_phase_active() {
            return Err(TimerError::InvalidTransition {
                completed: self.completed_participants,
                total: self.total_participants,
            });
        }

        self.completed_participants += 1;

        if self.completed_participants == self.total_participants {
            self.remaining_individual_seconds = 0;
            return Ok(AdvanceOutcome::PhaseComplete);
        }

        // Nobody gets more time than the meeting has left
        self.remaining_individual_seconds = self
            .starting_individual_seconds
            .min(self.remaining_meeting_seconds);

        Ok(AdvanceOutcome::NextParticipant {
            number: self.completed_participants + 1,
            seconds: self.remaining_individual_seconds,
        })
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Whether a participant is still being timed
    pub fn is_individual_phase_active(&self) -> bool {
        self.completed_participants < self.total_participants
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn remaining_individual_seconds(&self) -> u32 {
        self.remaining_individual_seconds
    }

    pub fn remaining_meeting_seconds(&self) -> u32 {
        self.remaining_meeting_seconds
    }

    pub fn starting_individual_seconds(&self) -> u32 {
        self.starting_individual_seconds
    }

    pub fn completed_participants(&self) -> u32 {
        self.completed_participants
    }

    pub fn total_participants(&self) -> u32 {
        self.total_participants
    }

    pub fn warning_time(&self) -> u32 {
        self.warning_time
    }

    /// Capture every persisted counter
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            remaining_individual_seconds: Some(self.remaining_individual_seconds),
            remaining_meeting_seconds: Some(self.remaining_meeting_seconds),
            starting_individual_seconds: Some(self.starting_individual_seconds),
            completed_participants: Some(self.completed_participants),
            total_participants: Some(self.total_participants),
            saved_at: None,
        }
    }
}
