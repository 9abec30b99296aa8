//! State shared between a driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use orbs_core::commands::PlayerCommand;
use orbs_core::state::GameStateSnapshot;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A player command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the loop thread after every tick.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

/// Driver-side handle to a running game loop.
pub struct LoopHandle {
    pub(crate) command_tx: mpsc::Sender<LoopCommand>,
    pub(crate) latest_snapshot: SharedSnapshot,
    pub(crate) thread: Option<JoinHandle<()>>,
}

impl LoopHandle {
    /// Forward a player command. Returns `false` once the loop has stopped.
    pub fn send(&self, command: PlayerCommand) -> bool {
        self.command_tx.send(LoopCommand::Player(command)).is_ok()
    }

    /// Clone of the most recent snapshot, if a tick has run.
    pub fn latest(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|lock| lock.clone())
    }

    /// Stop the loop and wait for its thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.command_tx.send(LoopCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("game loop thread panicked");
            }
        }
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_without_thread() {
        let (tx, rx) = mpsc::channel();
        let handle = LoopHandle {
            command_tx: tx,
            latest_snapshot: Arc::new(Mutex::new(None)),
            thread: None,
        };
        assert!(handle.latest().is_none());
        assert!(handle.send(PlayerCommand::Pause));
        assert!(matches!(rx.try_recv(), Ok(LoopCommand::Player(PlayerCommand::Pause))));

        drop(rx);
        assert!(!handle.send(PlayerCommand::Resume));
    }
}
