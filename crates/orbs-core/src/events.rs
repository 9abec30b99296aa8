//! Events emitted by the simulation for audio, particles, and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Vec2;

/// Discrete notifications produced during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    PlayerSpawned {
        id: u64,
        team: Team,
        position: Vec2,
        is_boss: bool,
    },
    PlayerDied {
        id: u64,
        team: Team,
        position: Vec2,
        killer: Option<u64>,
    },
    /// An orb damaged a player.
    PlayerHit {
        id: u64,
        damage: i32,
        health: i32,
        position: Vec2,
    },
    OrbDestroyed {
        id: u64,
        team: Team,
        position: Vec2,
        cause: OrbDestroyCause,
    },
    /// Two bodies started touching. For sound and particles.
    Contact { kind: ContactKind, position: Vec2 },
    AbilityActivated { player: u64, kind: AbilityKind },
    PowerUpSpawned {
        id: u64,
        kind: PowerUpKind,
        position: Vec2,
    },
    PowerUpCollected {
        id: u64,
        kind: PowerUpKind,
        message: String,
    },
    SpawnerExhausted { id: u64, position: Vec2 },
    WaveCleared { wave: u32 },
    WaveAdvanced { wave: u32, difficulty: WaveDifficulty },
    Victory { wave: u32 },
    Defeat { wave: u32 },
}
