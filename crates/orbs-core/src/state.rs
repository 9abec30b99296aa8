//! Read-only snapshots of the simulation state for a rendering layer.

use serde::{Deserialize, Serialize};

use crate::components::EffectSet;
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{SimTime, Vec2};

/// Complete view of the game after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub wave: WaveView,
    /// Sorted by id.
    pub players: Vec<PlayerView>,
    /// Sorted by id.
    pub orbs: Vec<OrbView>,
    pub spawners: Vec<SpawnerView>,
    pub power_ups: Vec<PowerUpView>,
    /// Events raised during this tick, in order.
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub number: u32,
    pub difficulty: WaveDifficulty,
    /// A delayed wave advance or victory is scheduled.
    pub transition_pending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: u64,
    pub team: Team,
    pub is_main: bool,
    pub is_boss: bool,
    pub position: Vec2,
    pub radius: f64,
    pub health: i32,
    pub max_health: i32,
    pub orb_count: usize,
    pub max_orbs: usize,
    pub stance: StanceKind,
    pub effects: EffectSet,
    pub damage_modifier: i32,
    pub mobility_modifier: f64,
    pub aim: Vec2,
    pub abilities: Vec<AbilityView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityView {
    pub kind: AbilityKind,
    pub icon: String,
    pub ready: bool,
    pub cooldown_remaining: f64,
    pub toggle: Toggle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbView {
    pub id: u64,
    pub owner: Option<u64>,
    pub team: Team,
    /// In its owner's formation.
    pub held: bool,
    pub position: Vec2,
    pub radius: f64,
    pub effects: EffectSet,
    pub rotation: f64,
    pub stretched: bool,
    pub damage_boosted: bool,
    pub visual_scale: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerView {
    pub id: u64,
    pub level: u8,
    pub is_boss: bool,
    pub position: Vec2,
    pub charges: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub id: u64,
    pub kind: PowerUpKind,
    pub position: Vec2,
    pub texture: String,
}
