//! Once-per-second tick task driving the meeting countdown

use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::{error::Result, state::SessionState};

/// Tick period
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Starts and stops the background tick task for a session
#[derive(Debug)]
pub struct TickScheduler {
    session: Arc<SessionState>,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl TickScheduler {
    pub fn new(session: Arc<SessionState>) -> Self {
        Self::with_period(session, TICK_PERIOD)
    }

    pub fn with_period(session: Arc<SessionState>, period: Duration) -> Self {
        Self {
            session,
            period,
            handle: None,
        }
    }

    /// Running only while the tick task is alive; a task that ended on its
    /// own (finished meeting, poisoned state) reports Stopped
    pub fn state(&self) -> SchedulerState {
        if self.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Begin ticking; the first tick lands one period from now.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }

        if self.handle.take().is_some() {
            debug!("Replacing ended tick task");
        }

        let epoch = self.session.begin_ticking()?;
        info!("Starting tick scheduler");

        let session = Arc::clone(&self.session);
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            tick_task(session, epoch, period).await;
        }));
        Ok(())
    }

    /// Stop ticking. No tick is applied after this returns.
    pub fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        info!("Stopping tick scheduler");
        let halted = self.session.halt_ticking();
        handle.abort();
        halted
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("Failed to stop tick scheduler: {}", e);
        }
    }
}

async fn tick_task(session: Arc<SessionState>, epoch: u64, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match session.tick(epoch) {
            Ok(Some(outcome)) => {
                debug!(
                    "Tick: individual={}s meeting={}s",
                    outcome.remaining_individual_seconds, outcome.remaining_meeting_seconds
                );
            }
            Ok(None) => {
                debug!("Tick gate closed for epoch {}, ending tick task", epoch);
                break;
            }
            Err(e) => {
                error!("Failed to apply tick: {}", e);
                break;
            }
        }
    }
}
