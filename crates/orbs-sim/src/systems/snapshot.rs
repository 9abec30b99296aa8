//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use orbs_core::components::*;
use orbs_core::enums::GamePhase;
use orbs_core::events::SimEvent;
use orbs_core::state::*;
use orbs_core::types::SimTime;

use crate::context::entity_id;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    wave: WaveView,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        wave,
        players: build_players(world),
        orbs: build_orbs(world),
        spawners: build_spawners(world),
        power_ups: build_power_ups(world),
        events,
    }
}

fn build_players(world: &World) -> Vec<PlayerView> {
    let mut players: Vec<PlayerView> = world
        .query::<(&Player, Option<&Loadout>, Option<&MainPlayer>)>()
        .iter()
        .map(|(entity, (p, loadout, main))| PlayerView {
            id: entity_id(entity),
            team: p.team,
            is_main: main.is_some(),
            is_boss: p.is_boss,
            position: p.position,
            radius: p.radius(),
            health: p.health,
            max_health: p.max_health,
            orb_count: p.orbs.len(),
            max_orbs: p.max_orbs,
            stance: p.stance,
            effects: p.effects.clone(),
            damage_modifier: p.damage_modifier,
            mobility_modifier: p.mobility_modifier,
            aim: p.aim,
            abilities: loadout.map(build_abilities).unwrap_or_default(),
        })
        .collect();

    players.sort_by_key(|p| p.id);
    players
}

fn build_abilities(loadout: &Loadout) -> Vec<AbilityView> {
    loadout
        .abilities
        .iter()
        .map(|a| AbilityView {
            kind: a.kind,
            icon: a.kind.icon_key().to_string(),
            ready: a.is_ready(),
            cooldown_remaining: a.cooldown_remaining,
            toggle: a.toggle,
        })
        .collect()
}

fn build_orbs(world: &World) -> Vec<OrbView> {
    let mut orbs: Vec<OrbView> = world
        .query::<&Orb>()
        .iter()
        .map(|(entity, o)| OrbView {
            id: entity_id(entity),
            owner: o.owner.map(entity_id),
            team: o.team,
            held: o.state == OrbState::Held,
            position: o.position,
            radius: o.radius,
            effects: o.effects.clone(),
            rotation: o.rotation,
            stretched: o.stretched,
            damage_boosted: o.damage_boosted,
            visual_scale: o.team.orb_visual_scale(),
        })
        .collect();

    orbs.sort_by_key(|o| o.id);
    orbs
}

fn build_spawners(world: &World) -> Vec<SpawnerView> {
    let mut spawners: Vec<SpawnerView> = world
        .query::<&Spawner>()
        .iter()
        .map(|(entity, s)| SpawnerView {
            id: entity_id(entity),
            level: s.level,
            is_boss: s.is_boss,
            position: s.position,
            charges: s.charges,
        })
        .collect();

    spawners.sort_by_key(|s| s.id);
    spawners
}

fn build_power_ups(world: &World) -> Vec<PowerUpView> {
    let mut power_ups: Vec<PowerUpView> = world
        .query::<&PowerUpPickup>()
        .iter()
        .map(|(entity, p)| PowerUpView {
            id: entity_id(entity),
            kind: p.kind,
            position: p.position,
            texture: p.kind.texture_key().to_string(),
        })
        .collect();

    power_ups.sort_by_key(|p| p.id);
    power_ups
}
