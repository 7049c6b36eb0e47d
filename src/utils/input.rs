//! Line input from the terminal

use std::{io::BufRead, thread};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Read stdin lines on a dedicated thread and forward them to the returned channel.
///
/// The thread is never joined, so a pending read cannot hold up process exit.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    let spawned = thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            debug!("Stdin reader finished");
        });

    if let Err(e) = spawned {
        warn!("Failed to start stdin reader, commands are disabled: {}", e);
    }
    rx
}
