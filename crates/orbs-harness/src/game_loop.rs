//! Game loop thread: runs the simulation engine at the reference frame rate
//! and publishes snapshots.
//!
//! Commands arrive via an `mpsc` channel. The latest snapshot is stored in
//! shared state for polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use orbs_core::constants::{DT, REFERENCE_FRAME_RATE};
use orbs_core::state::GameStateSnapshot;
use orbs_sim::SimulationEngine;

use crate::state::{LoopCommand, LoopHandle, SharedSnapshot};

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / REFERENCE_FRAME_RATE as u64);

/// Move `engine` onto a new thread and start ticking it.
pub fn spawn_game_loop(engine: SimulationEngine) -> io::Result<LoopHandle> {
    let (command_tx, command_rx) = mpsc::channel::<LoopCommand>();
    let latest_snapshot: SharedSnapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("orbs-game-loop".into())
        .spawn(move || run_game_loop(engine, command_rx, &shared))?;

    Ok(LoopHandle {
        command_tx,
        latest_snapshot,
        thread: Some(thread),
    })
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    command_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut next_tick_time = Instant::now();
    log::debug!("game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match command_rx.try_recv() {
                Ok(LoopCommand::Player(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    log::debug!("game loop stopped after {} ticks", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one frame (the engine handles pause internally)
        let snapshot = engine.tick(DT);

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbs_core::commands::PlayerCommand;
    use orbs_core::enums::GamePhase;
    use orbs_sim::SimConfig;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<LoopCommand>();

        tx.send(LoopCommand::Player(PlayerCommand::StartGame)).unwrap();
        tx.send(LoopCommand::Player(PlayerCommand::Pause)).unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();

        let commands: Vec<LoopCommand> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], LoopCommand::Player(PlayerCommand::StartGame)));
        assert!(matches!(commands[1], LoopCommand::Player(PlayerCommand::Pause)));
        assert!(matches!(commands[2], LoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_publishes_snapshots() {
        let engine = SimulationEngine::new(SimConfig::default()).unwrap();
        let handle = spawn_game_loop(engine).unwrap();
        assert!(handle.send(PlayerCommand::StartGame));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut active = false;
        while Instant::now() < deadline {
            if handle.latest().is_some_and(|s| s.phase == GamePhase::Active) {
                active = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        handle.shutdown();
        assert!(active, "loop never reported an active game");
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.666ms per tick
        assert_eq!(TICK_DURATION.as_nanos(), 1_000_000_000u128 / 60);
    }
}
