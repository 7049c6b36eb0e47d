//! Shared session state: the one lock every meeting mutation goes through

use std::sync::{Mutex, MutexGuard};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{AdvanceOutcome, Cue, MeetingState, Snapshot, TickOutcome};
use crate::{
    display::DisplayFrame,
    error::{Result, TimerError},
};

#[derive(Debug)]
struct Inner {
    meeting: MeetingState,
    /// Whether scheduled ticks may currently be applied
    ticking: bool,
    /// Bumped every time ticking starts, so a stale tick task cannot apply
    epoch: u64,
}

/// Meeting state behind a single mutex, plus change notifications
#[derive(Debug)]
pub struct SessionState {
    inner: Mutex<Inner>,
    /// Display frames, published after every mutation
    display_tx: watch::Sender<DisplayFrame>,
    /// Cues emitted by ticks
    cue_tx: broadcast::Sender<Cue>,
}

impl SessionState {
    pub fn new(meeting: MeetingState) -> Self {
        let (display_tx, _) = watch::channel(DisplayFrame::from_meeting(&meeting));
        let (cue_tx, _) = broadcast::channel(16);

        Self {
            inner: Mutex::new(Inner {
                meeting,
                ticking: false,
                epoch: 0,
            }),
            display_tx,
            cue_tx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| TimerError::StatePoisoned)
    }

    /// Publish a new frame. Never blocks; a frame nobody watches is dropped.
    fn publish(&self, meeting: &MeetingState) {
        self.display_tx.send_replace(DisplayFrame::from_meeting(meeting));
    }

    /// Subscribe to display refreshes
    pub fn subscribe_display(&self) -> watch::Receiver<DisplayFrame> {
        self.display_tx.subscribe()
    }

    /// Subscribe to emitted cues
    pub fn subscribe_cues(&self) -> broadcast::Receiver<Cue> {
        self.cue_tx.subscribe()
    }

    /// Open the tick gate and return the epoch a tick task must present
    pub fn begin_ticking(&self) -> Result<u64> {
        let mut inner = self.lock()?;
        inner.epoch += 1;
        inner.ticking = true;
        debug!("Ticking enabled for epoch {}", inner.epoch);
        Ok(inner.epoch)
    }

    /// Close the tick gate. Once this returns no further tick is applied.
    pub fn halt_ticking(&self) -> Result<()> {
        let mut inner = self.lock()?;
        inner.ticking = false;
        debug!("Ticking halted at epoch {}", inner.epoch);
        Ok(())
    }

    /// Apply one scheduled tick.
    ///
    /// Returns `None` when the gate is closed, the epoch is stale, or the
    /// meeting is finished; the caller should stop ticking in that case.
    pub fn tick(&self, epoch: u64) -> Result<Option<TickOutcome>> {
        let mut inner = self.lock()?;
        if !inner.ticking || inner.epoch != epoch || inner.meeting.is_finished() {
            return Ok(None);
        }

        let outcome = inner.meeting.tick();
        self.publish(&inner.meeting);
        drop(inner);

        if let Some(cue) = outcome.cue {
            if let Err(e) = self.cue_tx.send(cue) {
                warn!("No listener for {:?} cue: {}", cue, e);
            }
        }

        Ok(Some(outcome))
    }

    /// Move on to the next participant
    pub fn advance_participant(&self) -> Result<AdvanceOutcome> {
        let mut inner = self.lock()?;
        let outcome = inner.meeting.advance_participant()?;
        self.publish(&inner.meeting);

        match outcome {
            AdvanceOutcome::NextParticipant { number, seconds } => {
                info!("Participant {} up with {}s", number, seconds)
            }
            AdvanceOutcome::PhaseComplete => info!("All participants have spoken"),
        }
        Ok(outcome)
    }

    /// Mark the meeting finished; idempotent
    pub fn finish(&self) -> Result<()> {
        let mut inner = self.lock()?;
        if !inner.meeting.is_finished() {
            info!("Meeting finished");
        }
        inner.meeting.finish();
        inner.ticking = false;
        self.publish(&inner.meeting);
        Ok(())
    }

    /// Copy of the current counters
    pub fn meeting(&self) -> Result<MeetingState> {
        self.lock().map(|inner| inner.meeting.clone())
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        self.lock().map(|inner| inner.meeting.snapshot())
    }

    pub fn is_finished(&self) -> Result<bool> {
        self.lock().map(|inner| inner.meeting.is_finished())
    }

    /// Current display frame
    pub fn frame(&self) -> DisplayFrame {
        self.display_tx.borrow().clone()
    }
}
