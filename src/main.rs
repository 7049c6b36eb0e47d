//! Standup Timer - a meeting pacing timer for the terminal
//!
//! This is the main entry point for the standup-timer application.

use tracing::info;

use standup_timer::{
    config::Config,
    controller::{run_session, SessionExit},
    display::TerminalRenderer,
    services::{
        check_inhibitor_available, CommandCuePlayer, InhibitorLock, JsonFileStore, NoopWakeLock,
        SnapshotStore, WakeLock,
    },
    session::Session,
    utils::{shutdown_signal, spawn_stdin_reader},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they do not tear the status line on stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("standup_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting standup-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: participants={}, length={}s, warning={}s",
        config.participants,
        config.meeting_seconds(),
        config.warning_time
    );

    let store = JsonFileStore::new(config.state_path());
    if config.fresh {
        store.clear()?;
    }

    let wake_lock: Box<dyn WakeLock> = if config.no_wake_lock {
        Box::new(NoopWakeLock::default())
    } else if let Err(e) = check_inhibitor_available().await {
        tracing::warn!("{}, the display may sleep", e);
        Box::new(NoopWakeLock::default())
    } else {
        Box::new(InhibitorLock::new())
    };

    let cues = CommandCuePlayer::new(
        config.player.clone(),
        config.warning_sound.clone(),
        config.finished_sound.clone(),
    );

    let session = Session::open(
        &config.session_settings(),
        Box::new(store),
        wake_lock,
        Box::new(cues),
    )?;

    println!("Enter = next participant, f = finish meeting, Ctrl-C = pause and save");

    let mut renderer = TerminalRenderer::stdout();
    let exit = run_session(
        session,
        spawn_stdin_reader(),
        &mut renderer,
        shutdown_signal(),
    )
    .await?;

    if exit == SessionExit::Interrupted {
        println!("Meeting saved, run again to resume");
    }

    info!("Shutdown complete");
    Ok(())
}
