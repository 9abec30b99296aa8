//! Commands sent from an external driver to the simulation engine.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Input for the simulation, applied at the next tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Spawn the main player and the first wave.
    StartGame,
    Pause,
    Resume,
    /// Movement input for the main player. Components in [-1, 1];
    /// scaled by the joystick reach. Persists until replaced.
    Move { direction: Vec2 },
    /// Trigger the ability in the given loadout slot.
    TriggerAbility { index: usize },
    /// Second trigger of a double-active ability.
    TriggerSecondary { index: usize },
}
