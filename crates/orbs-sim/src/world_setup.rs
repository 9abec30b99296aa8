//! Entity factories and lifecycle helpers.
//!
//! Everything that creates or removes players, orbs, spawners, and pickups
//! goes through here so orb lists, owner handles, timers, and events stay
//! consistent.

use hecs::{Entity, World};

use orbs_core::components::*;
use orbs_core::constants::*;
use orbs_core::enums::*;
use orbs_core::events::SimEvent;
use orbs_core::types::Vec2;
use orbs_procgen::placement::{self, SpawnerPlacement};
use orbs_procgen::PlayerBlueprint;

use crate::abilities;
use crate::context::{entity_id, SimContext};

/// Parameters for a new player.
#[derive(Debug, Clone)]
pub struct PlayerSpawn {
    pub team: Team,
    pub position: Vec2,
    pub health: i32,
    pub orbs: usize,
    pub abilities: Vec<Ability>,
    pub behaviour: Behaviour,
    pub stance: StanceKind,
    pub is_boss: bool,
    pub is_main: bool,
}

impl PlayerSpawn {
    /// The input-controlled player at the centre of the arena.
    pub fn main_player(ctx: &SimContext) -> Self {
        Self {
            team: Team::Blue,
            position: Vec2::ZERO,
            health: PLAYER_DEFAULT_HEALTH,
            orbs: MAIN_PLAYER_INITIAL_ORBS,
            abilities: ctx.content.instantiate_loadout(&ctx.content.main_player_loadout),
            behaviour: Behaviour::None,
            stance: StanceKind::Orbital,
            is_boss: false,
            is_main: true,
        }
    }

    /// An enemy built from a spawner blueprint.
    pub fn enemy(blueprint: PlayerBlueprint, spawner_position: Vec2) -> Self {
        Self {
            team: Team::Red,
            position: spawner_position + blueprint.offset,
            health: blueprint.health,
            orbs: blueprint.orbs,
            abilities: blueprint.abilities,
            behaviour: blueprint.behaviour,
            stance: blueprint.stance,
            is_boss: blueprint.is_boss,
            is_main: false,
        }
    }
}

/// Spawn a player with its loadout and initial orbs.
pub fn spawn_player(world: &mut World, ctx: &mut SimContext, spawn: PlayerSpawn) -> Entity {
    let mut player = Player::new(spawn.team, spawn.position, spawn.health);
    player.behaviour = spawn.behaviour;
    player.is_boss = spawn.is_boss;
    player.stance = spawn.stance;
    player.mobility_modifier += spawn.stance.passive_mobility();

    let loadout = Loadout {
        abilities: spawn.abilities,
    };
    let entity = if spawn.is_main {
        world.spawn((player, loadout, MainPlayer))
    } else {
        world.spawn((player, loadout))
    };
    spawn_orbs(world, entity, spawn.orbs, &EffectSet::new());
    abilities::apply_passives(world, entity);

    log::debug!(
        "spawned {:?} player {} at ({:.0}, {:.0}) with {} orbs",
        spawn.team,
        entity_id(entity),
        spawn.position.x,
        spawn.position.y,
        spawn.orbs
    );
    ctx.emit(SimEvent::PlayerSpawned {
        id: entity_id(entity),
        team: spawn.team,
        position: spawn.position,
        is_boss: spawn.is_boss,
    });
    entity
}

/// Spawn up to `count` new orbs at the player's position. Stops once the
/// player is full. Returns the number spawned.
pub fn spawn_orbs(world: &mut World, player: Entity, count: usize, effects: &EffectSet) -> usize {
    let mut spawned = 0;
    for _ in 0..count {
        let (team, position, full) = match world.get::<&Player>(player) {
            Ok(p) => (p.team, p.position, p.is_full()),
            Err(_) => break,
        };
        if full {
            break;
        }
        let orb = world.spawn((Orb::new(team, Some(player), position, effects.clone()),));
        if !adopt_orb(world, player, orb) {
            let _ = world.despawn(orb);
            break;
        }
        spawned += 1;
    }
    spawned
}

/// Put an existing orb into a player's list.
///
/// Normal orbs go below the lowest special orb, special orbs go on top.
/// Returns `false` when the player is missing or full.
pub fn adopt_orb(world: &mut World, player: Entity, orb: Entity) -> bool {
    let (team, mut list) = match world.get::<&Player>(player) {
        Ok(p) if !p.is_full() => (p.team, p.orbs.clone()),
        _ => return false,
    };

    let special = match world.get::<&mut Orb>(orb) {
        Ok(mut o) => {
            o.owner = Some(player);
            o.team = team;
            o.state = OrbState::Held;
            o.speed = ORB_DEFAULT_SPEED;
            o.stretched = false;
            o.is_special()
        }
        Err(_) => return false,
    };

    let index = if special {
        list.len()
    } else {
        list.iter()
            .position(|&e| world.get::<&Orb>(e).map(|o| o.is_special()).unwrap_or(false))
            .unwrap_or(list.len())
    };
    list.insert(index, orb);

    match world.get::<&mut Player>(player) {
        Ok(mut p) => {
            p.orbs = list;
            true
        }
        Err(_) => false,
    }
}

/// Move up to `count` orbs from the top of `from`'s list to `to`, within
/// `to`'s capacity. Returns the number moved.
pub fn transfer_orbs(world: &mut World, from: Entity, to: Entity, count: usize) -> usize {
    let mut moved = 0;
    while moved < count {
        let full = world.get::<&Player>(to).map(|p| p.is_full()).unwrap_or(true);
        if full {
            break;
        }
        let orb = match world.get::<&mut Player>(from) {
            Ok(mut p) => p.orbs.pop(),
            Err(_) => None,
        };
        let Some(orb) = orb else { break };
        if !adopt_orb(world, to, orb) {
            // Put it back where it came from.
            if let Ok(mut p) = world.get::<&mut Player>(from) {
                p.orbs.push(orb);
            }
            break;
        }
        moved += 1;
    }
    moved
}

/// Remove an orb from the world and from its owner's list.
pub fn destroy_orb(world: &mut World, ctx: &mut SimContext, orb: Entity, cause: OrbDestroyCause) {
    let (owner, team, position) = match world.get::<&Orb>(orb) {
        Ok(o) => (o.owner, o.team, o.position),
        Err(_) => return,
    };
    if let Some(owner) = owner {
        if let Ok(mut p) = world.get::<&mut Player>(owner) {
            p.orbs.retain(|&e| e != orb);
        }
    }
    let _ = world.despawn(orb);
    ctx.timers.forget_entity(orb);
    ctx.emit(SimEvent::OrbDestroyed {
        id: entity_id(orb),
        team,
        position,
        cause,
    });
}

/// Kill a player, crediting `killer`.
///
/// Held orbs go to the killer while it has room; the rest are destroyed.
/// Orbs in flight lose their owner handle. Enemies may drop a bonus.
pub fn kill_player(world: &mut World, ctx: &mut SimContext, victim: Entity, killer: Option<Entity>) {
    let (team, position, held) = match world.get::<&mut Player>(victim) {
        Ok(mut p) => (p.team, p.position, std::mem::take(&mut p.orbs)),
        Err(_) => return,
    };
    let killer = killer.filter(|&k| k != victim && world.contains(k));

    let mut remaining = held.into_iter();
    if let Some(killer) = killer {
        for orb in remaining.by_ref() {
            if !adopt_orb(world, killer, orb) {
                destroy_orb(world, ctx, orb, OrbDestroyCause::OwnerDied);
                break;
            }
        }
    }
    for orb in remaining {
        destroy_orb(world, ctx, orb, OrbDestroyCause::OwnerDied);
    }

    for (_entity, orb) in world.query_mut::<&mut Orb>() {
        if orb.owner == Some(victim) {
            orb.owner = None;
        }
    }

    if team == Team::Red {
        if let Some((kind, drop_position)) = placement::bonus_drop(position, &mut ctx.rng) {
            spawn_power_up(world, ctx, kind, drop_position);
        }
    }

    let _ = world.despawn(victim);
    ctx.timers.forget_entity(victim);
    log::debug!("{:?} player {} died", team, entity_id(victim));
    ctx.emit(SimEvent::PlayerDied {
        id: entity_id(victim),
        team,
        position,
        killer: killer.map(entity_id),
    });
}

pub fn spawn_power_up(world: &mut World, ctx: &mut SimContext, kind: PowerUpKind, position: Vec2) -> Entity {
    let entity = world.spawn((PowerUpPickup { kind, position },));
    ctx.emit(SimEvent::PowerUpSpawned {
        id: entity_id(entity),
        kind,
        position,
    });
    entity
}

/// Spawn a spawner for a placement. Levels missing from the content tables
/// are skipped.
pub fn spawn_spawner(world: &mut World, ctx: &SimContext, placement: &SpawnerPlacement) -> Option<Entity> {
    let Some(spec) = ctx.content.spawner_level(placement.level) else {
        log::warn!("no spawner level {} in content tables", placement.level);
        return None;
    };
    let spawner = Spawner {
        level: spec.level,
        is_boss: spec.is_boss,
        team: Team::Red,
        position: placement.position,
        charges: spec.charges,
        interval_secs: spec.interval_secs,
        counter: 0.0,
    };
    log::debug!("spawner level {} placed on {:?} side", spec.level, placement.side);
    Some(world.spawn((spawner,)))
}
