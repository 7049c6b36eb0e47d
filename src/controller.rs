//! Controller loop wiring user input, ticks, cues and the display together

use std::future::Future;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{debug, info, warn};

use crate::{
    display::Renderer,
    error::Result,
    session::Session,
};

/// A text command typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Next,
    Finish,
    Unknown(String),
}

impl UserCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "" | "n" | "next" => Self::Next,
            "f" | "finish" | "q" | "quit" | "exit" => Self::Finish,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// How a session loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// The user ended the meeting; the snapshot was cleared
    Finished,
    /// The session was interrupted; the snapshot was saved
    Interrupted,
}

/// Run a session until the user finishes it or `shutdown` resolves.
///
/// Starts ticking, renders every display refresh, plays emitted cues, and
/// suspends the session on the way out. `input` carries lines typed by the
/// user; once it closes the session keeps running until shutdown.
pub async fn run_session<S>(
    mut session: Session,
    mut input: mpsc::UnboundedReceiver<String>,
    renderer: &mut dyn Renderer,
    shutdown: S,
) -> Result<SessionExit>
where
    S: Future<Output = ()>,
{
    let mut display_rx = session.state().subscribe_display();
    let mut cue_rx = session.state().subscribe_cues();
    let mut input_open = true;
    tokio::pin!(shutdown);

    if let Err(e) = renderer.render(&display_rx.borrow_and_update()) {
        warn!("Failed to render display: {}", e);
    }
    session.resume()?;

    let exit = loop {
        tokio::select! {
            changed = display_rx.changed() => {
                if changed.is_err() {
                    break SessionExit::Interrupted;
                }
                let frame = display_rx.borrow_and_update().clone();
                if let Err(e) = renderer.render(&frame) {
                    warn!("Failed to render display: {}", e);
                }
            }

            cue = cue_rx.recv() => {
                match cue {
                    Ok(cue) => session.dispatch_cue(cue),
                    Err(RecvError::Lagged(skipped)) => warn!("Dropped {} cues", skipped),
                    Err(RecvError::Closed) => break SessionExit::Interrupted,
                }
            }

            line = input.recv(), if input_open => {
                match line {
                    Some(line) => match UserCommand::parse(&line) {
                        UserCommand::Next => {
                            session.advance_participant()?;
                        }
                        UserCommand::Finish => {
                            session.finish()?;
                            break SessionExit::Finished;
                        }
                        UserCommand::Unknown(other) => {
                            debug!("Unknown command: {:?}", other);
                        }
                    },
                    None => {
                        debug!("Input closed, continuing without commands");
                        input_open = false;
                    }
                }
            }

            _ = &mut shutdown => {
                info!("Interrupted, saving meeting");
                break SessionExit::Interrupted;
            }
        }
    };

    let suspended = session.suspend();

    if let Err(e) = renderer.render(&session.state().frame()) {
        warn!("Failed to render display: {}", e);
    }
    if let Err(e) = renderer.close() {
        warn!("Failed to close display: {}", e);
    }

    suspended?;
    info!("Session ended: {:?}", exit);
    Ok(exit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(UserCommand::parse(""), UserCommand::Next);
        assert_eq!(UserCommand::parse("n\n"), UserCommand::Next);
        assert_eq!(UserCommand::parse(" Next "), UserCommand::Next);
        assert_eq!(UserCommand::parse("f"), UserCommand::Finish);
        assert_eq!(UserCommand::parse("QUIT"), UserCommand::Finish);
        assert_eq!(
            UserCommand::parse("skip"),
            UserCommand::Unknown("skip".to_string())
        );
    }
}
