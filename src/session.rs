//! Session lifecycle: resume, suspend and the two user actions

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::{Result, TimerError},
    services::{load_or_default, CuePlayer, SnapshotStore, WakeLock},
    state::{AdvanceOutcome, Cue, MeetingState, SessionState},
    tasks::TickScheduler,
};

/// Settings a session is created from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub total_participants: u32,
    pub meeting_seconds: u32,
    pub warning_time: u32,
    pub sounds_enabled: bool,
}

/// One meeting session and the resources it owns
pub struct Session {
    state: Arc<SessionState>,
    scheduler: TickScheduler,
    wake_lock: Box<dyn WakeLock>,
    cues: Option<Box<dyn CuePlayer>>,
    store: Box<dyn SnapshotStore>,
    sounds_enabled: bool,
}

impl Session {
    /// Create a session, resuming from the stored snapshot when there is one
    pub fn open(
        settings: &SessionSettings,
        store: Box<dyn SnapshotStore>,
        wake_lock: Box<dyn WakeLock>,
        cues: Box<dyn CuePlayer>,
    ) -> Result<Self> {
        let snapshot = load_or_default(&*store);
        if let Some(snapshot) = &snapshot {
            match snapshot.saved_at {
                Some(saved_at) => info!("Resuming meeting saved at {}", saved_at),
                None => info!("Resuming saved meeting"),
            }
        }

        let meeting = MeetingState::initialize(
            settings.total_participants,
            settings.meeting_seconds,
            settings.warning_time,
            snapshot.as_ref(),
        )?;
        info!(
            "Meeting: {} participants, {}s total, {}s each, warning at {}s",
            meeting.total_participants(),
            meeting.remaining_meeting_seconds(),
            meeting.starting_individual_seconds(),
            meeting.warning_time()
        );

        let state = Arc::new(SessionState::new(meeting));
        Ok(Self {
            scheduler: TickScheduler::new(Arc::clone(&state)),
            state,
            wake_lock,
            cues: Some(cues),
            store,
            sounds_enabled: settings.sounds_enabled,
        })
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn wake_lock_held(&self) -> bool {
        self.wake_lock.is_held()
    }

    /// Keep the display awake and start ticking
    pub fn resume(&mut self) -> Result<()> {
        if self.state.is_finished()? {
            debug!("Meeting already finished, not resuming");
            return Ok(());
        }

        if let Err(e) = self.wake_lock.acquire() {
            warn!("Continuing without wake lock: {}", e);
        }
        self.scheduler.start()
    }

    /// Stop ticking, let the display sleep, and persist or clear the snapshot
    pub fn suspend(&mut self) -> Result<()> {
        self.scheduler.stop()?;
        self.wake_lock.release();

        if self.state.is_finished()? {
            self.store.clear()
        } else {
            let snapshot = self.state.snapshot()?.stamped();
            self.store.save(&snapshot)
        }
    }

    /// Hand the floor to the next participant.
    ///
    /// Advancing past the last participant is logged and ignored.
    pub fn advance_participant(&self) -> Result<Option<AdvanceOutcome>> {
        match self.state.advance_participant() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e @ TimerError::InvalidTransition { .. }) => {
                warn!("Ignoring advance: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// End the meeting: release the cue player and mark it finished
    pub fn finish(&mut self) -> Result<()> {
        if let Some(mut cues) = self.cues.take() {
            cues.release();
        }
        self.state.finish()
    }

    /// Play a cue emitted by a tick, if sounds are on and the player is still held
    pub fn dispatch_cue(&mut self, cue: Cue) {
        if !self.sounds_enabled {
            debug!("Sounds disabled, skipping {:?} cue", cue);
            return;
        }

        match self.cues.as_mut() {
            Some(player) => player.play(cue),
            None => debug!("Cue player released, skipping {:?} cue", cue),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(mut cues) = self.cues.take() {
            cues.release();
        }
        self.wake_lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{MemoryStore, NoopWakeLock},
        state::Snapshot,
    };
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedCues(Arc<Mutex<Vec<Cue>>>);

    impl CuePlayer for SharedCues {
        fn play_warning(&mut self) {
            self.0.lock().unwrap().push(Cue::Warning);
        }

        fn play_finished(&mut self) {
            self.0.lock().unwrap().push(Cue::Finished);
        }
    }

    /// Store handle the test keeps after moving a clone into the session
    #[derive(Clone, Default)]
    struct SharedStore(Arc<MemoryStore>);

    impl SnapshotStore for SharedStore {
        fn load(&self) -> Result<Option<Snapshot>> {
            self.0.load()
        }

        fn save(&self, snapshot: &Snapshot) -> Result<()> {
            self.0.save(snapshot)
        }

        fn clear(&self) -> Result<()> {
            self.0.clear()
        }
    }

    /// Store whose writes always fail
    #[derive(Clone, Default)]
    struct FailingStore {
        saves: Arc<AtomicUsize>,
    }

    impl SnapshotStore for FailingStore {
        fn load(&self) -> Result<Option<Snapshot>> {
            Ok(None)
        }

        fn save(&self, _snapshot: &Snapshot) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::new(io::ErrorKind::Other, "disk full").into())
        }

        fn clear(&self) -> Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full").into())
        }
    }

    /// Wake lock that can never be taken
    struct FailingWakeLock;

    impl WakeLock for FailingWakeLock {
        fn acquire(&mut self) -> Result<()> {
            Err(TimerError::WakeLock("no inhibitor".to_string()))
        }

        fn release(&mut self) {}

        fn is_held(&self) -> bool {
            false
        }
    }

    fn settings(sounds_enabled: bool) -> SessionSettings {
        SessionSettings {
            total_participants: 3,
            meeting_seconds: 600,
            warning_time: 10,
            sounds_enabled,
        }
    }

    fn open(store: &SharedStore, cues: &SharedCues, sounds: bool) -> Session {
        Session::open(
            &settings(sounds),
            Box::new(store.clone()),
            Box::new(NoopWakeLock::default()),
            Box::new(cues.clone()),
        )
        .unwrap()
    }

    #[test]
    fn test_open_rejects_zero_participants() {
        let result = Session::open(
            &SessionSettings {
                total_participants: 0,
                ..settings(true)
            },
            Box::new(MemoryStore::new()),
            Box::new(NoopWakeLock::default()),
            Box::new(SharedCues::default()),
        );
        assert!(matches!(result, Err(TimerError::Configuration(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspend_saves_and_reopen_restores() {
        let store = SharedStore::default();
        let cues = SharedCues::default();

        let mut session = open(&store, &cues, true);
        session.resume().unwrap();
        assert!(session.is_running());
        assert!(session.wake_lock_held());

        tokio::time::sleep(Duration::from_millis(5500)).await;
        session.advance_participant().unwrap();
        session.suspend().unwrap();
        assert!(!session.is_running());
        assert!(!session.wake_lock_held());

        let before = session.state().meeting().unwrap();
        drop(session);

        let snapshot = store.load().unwrap().unwrap();
        assert_eq!(snapshot.remaining_meeting_seconds, Some(595));
        assert!(snapshot.saved_at.is_some());

        let reopened = open(&store, &cues, true);
        assert_eq!(reopened.state().meeting().unwrap(), before);
    }

    #[tokio::test]
    async fn test_finish_clears_snapshot() {
        let store = SharedStore::default();
        store.save(&Snapshot {
            remaining_meeting_seconds: Some(100),
            ..Snapshot::default()
        })
        .unwrap();

        let mut session = open(&store, &SharedCues::default(), true);
        assert_eq!(
            session.state().meeting().unwrap().remaining_meeting_seconds(),
            100
        );

        session.resume().unwrap();
        session.finish().unwrap();
        session.finish().unwrap();
        session.suspend().unwrap();

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_advance_past_total_is_ignored() {
        let mut session = Session::open(
            &SessionSettings {
                total_participants: 1,
                ..settings(true)
            },
            Box::new(MemoryStore::new()),
            Box::new(NoopWakeLock::default()),
            Box::new(SharedCues::default()),
        )
        .unwrap();

        assert_eq!(
            session.advance_participant().unwrap(),
            Some(AdvanceOutcome::PhaseComplete)
        );
        assert_eq!(session.advance_participant().unwrap(), None);
        session.finish().unwrap();
    }

    #[test]
    fn test_dispatch_respects_sound_setting() {
        let cues = SharedCues::default();
        let mut quiet = open(&SharedStore::default(), &cues, false);
        quiet.dispatch_cue(Cue::Warning);
        assert!(cues.0.lock().unwrap().is_empty());

        let mut loud = open(&SharedStore::default(), &cues, true);
        loud.dispatch_cue(Cue::Warning);
        loud.dispatch_cue(Cue::Finished);
        assert_eq!(*cues.0.lock().unwrap(), vec![Cue::Warning, Cue::Finished]);

        loud.finish().unwrap();
        loud.dispatch_cue(Cue::Finished);
        assert_eq!(cues.0.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_finished_session_does_not_resume() {
        let mut session = open(&SharedStore::default(), &SharedCues::default(), true);
        session.finish().unwrap();
        session.resume().unwrap();
        assert!(!session.is_running());
        assert!(!session.wake_lock_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_is_returned_once() {
        let store = FailingStore::default();
        let mut session = Session::open(
            &settings(true),
            Box::new(store.clone()),
            Box::new(NoopWakeLock::default()),
            Box::new(SharedCues::default()),
        )
        .unwrap();

        session.resume().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let result = session.suspend();
        assert!(matches!(result, Err(TimerError::Io(_))));
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert!(!session.is_running());
        assert!(!session.wake_lock_held());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            session.state().meeting().unwrap().remaining_meeting_seconds(),
            599
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_without_wake_lock() {
        let mut session = Session::open(
            &settings(true),
            Box::new(MemoryStore::new()),
            Box::new(FailingWakeLock),
            Box::new(SharedCues::default()),
        )
        .unwrap();

        session.resume().unwrap();
        assert!(session.is_running());
        assert!(!session.wake_lock_held());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(
            session.state().meeting().unwrap().remaining_meeting_seconds(),
            597
        );

        session.suspend().unwrap();
    }
}
