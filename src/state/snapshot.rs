//! Persisted session snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters needed to resume an interrupted meeting.
///
/// Every field is optional so that a partially written snapshot still loads;
/// a missing counter falls back to its freshly computed default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_individual_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_meeting_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_individual_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_participants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_participants: Option<u32>,
    /// When the snapshot was written, informational only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// True when no counter is present
    pub fn is_empty(&self) -> bool {
        self.remaining_individual_seconds.is_none()
            && self.remaining_meeting_seconds.is_none()
            && self.starting_individual_seconds.is_none()
            && self.completed_participants.is_none()
            && self.total_participants.is_none()
    }

    /// Stamp the snapshot with the current time
    pub fn stamped(mut self) -> Self {
        self.saved_at = Some(Utc::now());
        self
    }
}
