//! Keeping the display awake while a meeting is being timed

use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::error::{Result, TimerError};

/// Exclusive stay-awake lock; acquiring or releasing twice is a no-op
pub trait WakeLock: Send {
    fn acquire(&mut self) -> Result<()>;
    fn release(&mut self);
    fn is_held(&self) -> bool;
}

/// Lock that does nothing, for `--no-wake-lock` and tests
#[derive(Debug, Default)]
pub struct NoopWakeLock {
    held: bool,
}

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self) -> Result<()> {
        self.held = true;
        Ok(())
    }

    fn release(&mut self) {
        self.held = false;
    }

    fn is_held(&self) -> bool {
        self.held
    }
}

/// Holds a `systemd-inhibit` child for as long as the lock is held
#[derive(Debug, Default)]
pub struct InhibitorLock {
    child: Option<Child>,
}

impl InhibitorLock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WakeLock for InhibitorLock {
    fn acquire(&mut self) -> Result<()> {
        if self.child.is_some() {
            return Ok(());
        }

        debug!("Acquiring wake lock");
        let child = Command::new("systemd-inhibit")
            .args([
                "--what=idle:sleep",
                "--who=standup-timer",
                "--why=Meeting timer running",
                "--mode=block",
                "sleep",
                "infinity",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TimerError::WakeLock(format!("failed to run systemd-inhibit: {}", e)))?;

        info!("Wake lock acquired");
        self.child = Some(child);
        Ok(())
    }

    fn release(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        debug!("Releasing wake lock");
        if let Err(e) = child.start_kill() {
            warn!("Failed to release wake lock: {}", e);
        } else {
            info!("Wake lock released");
        }
    }

    fn is_held(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for InhibitorLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Check if systemd-inhibit is available on the system
pub async fn check_inhibitor_available() -> Result<()> {
    check_inhibitor_command("systemd-inhibit").await
}

async fn check_inhibitor_command(program: &str) -> Result<()> {
    let output = Command::new(program)
        .arg("--version")
        .output()
        .await
        .map_err(|_| TimerError::WakeLock(format!("{} is not available", program)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TimerError::WakeLock(format!(
            "{} --version failed: {}",
            program,
            stderr.trim()
        )));
    }

    debug!("{} is available", program);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_lock_is_idempotent() {
        let mut lock = NoopWakeLock::default();
        assert!(!lock.is_held());

        lock.acquire().unwrap();
        lock.acquire().unwrap();
        assert!(lock.is_held());

        lock.release();
        lock.release();
        assert!(!lock.is_held());
    }

    #[tokio::test]
    async fn test_missing_inhibitor_is_reported() {
        let result = check_inhibitor_command("/nonexistent/standup-timer-inhibit").await;
        assert!(matches!(result, Err(TimerError::WakeLock(_))));
    }

    #[tokio::test]
    async fn test_failing_inhibitor_is_reported() {
        // GNU `false` exits non-zero even for --version
        let result = check_inhibitor_command("false").await;
        assert!(matches!(result, Err(TimerError::WakeLock(_))));
    }

    #[test]
    fn test_inhibitor_release_without_acquire() {
        let mut lock = InhibitorLock::new();
        lock.release();
        assert!(!lock.is_held());
    }
}
