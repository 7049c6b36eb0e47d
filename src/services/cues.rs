//! Audible warning and finished cues

use std::{
    io::{self, Write},
    path::PathBuf,
    process::Stdio,
};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::state::Cue;

/// Plays the two meeting cues. Playback is fire-and-forget and never fails
/// the caller.
pub trait CuePlayer: Send {
    fn play_warning(&mut self);
    fn play_finished(&mut self);

    /// Stop anything still playing and free the player
    fn release(&mut self) {}

    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Warning => self.play_warning(),
            Cue::Finished => self.play_finished(),
        }
    }
}

/// One sound: the file to play and the instance currently playing it
#[derive(Debug, Default)]
struct Sound {
    file: Option<PathBuf>,
    playing: Option<Child>,
}

/// Plays cue files through an external player command such as `paplay`.
///
/// A cue without a file rings the terminal bell instead.
#[derive(Debug)]
pub struct CommandCuePlayer {
    player: String,
    warning: Sound,
    finished: Sound,
}

impl CommandCuePlayer {
    pub fn new(
        player: impl Into<String>,
        warning_file: Option<PathBuf>,
        finished_file: Option<PathBuf>,
    ) -> Self {
        Self {
            player: player.into(),
            warning: Sound {
                file: warning_file,
                playing: None,
            },
            finished: Sound {
                file: finished_file,
                playing: None,
            },
        }
    }

    fn play_sound(player: &str, sound: &mut Sound, name: &str) {
        // Restart from the beginning if the previous instance is still going
        if let Some(mut previous) = sound.playing.take() {
            let _ = previous.start_kill();
        }

        let Some(file) = &sound.file else {
            ring_bell();
            return;
        };

        debug!("Playing the {} sound", name);
        match Command::new(player)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => sound.playing = Some(child),
            Err(e) => warn!("Failed to play {} sound with {}: {}", name, player, e),
        }
    }
}

impl CuePlayer for CommandCuePlayer {
    fn play_warning(&mut self) {
        Self::play_sound(&self.player, &mut self.warning, "warning");
    }

    fn play_finished(&mut self) {
        Self::play_sound(&self.player, &mut self.finished, "finished");
    }

    fn release(&mut self) {
        for sound in [&mut self.warning, &mut self.finished] {
            if let Some(mut child) = sound.playing.take() {
                let _ = child.start_kill();
            }
        }
        debug!("Cue player released");
    }
}

impl Drop for CommandCuePlayer {
    fn drop(&mut self) {
        self.release();
    }
}

fn ring_bell() {
    let mut out = io::stdout();
    if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
        warn!("Failed to ring terminal bell: {}", e);
    }
}
