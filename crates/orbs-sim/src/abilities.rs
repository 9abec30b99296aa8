//! Ability activation, dispatched on the ability's kind and capabilities.
//!
//! Every activation goes through the same gate: the slot must exist, the
//! owner must not be stunned, the kind must support the requested action,
//! and the ability must be ready. A rejected activation changes nothing.
//! A successful one enters cooldown and emits `AbilityActivated`.

use hecs::{Entity, World};

use orbs_core::components::{Loadout, Orb, OrbState, Player};
use orbs_core::constants::*;
use orbs_core::enums::{AbilityKind, Capability, Effect, RejectReason, StanceKind, Toggle};
use orbs_core::events::SimEvent;
use orbs_core::types::{PlayArea, Vec2, VectorExt};

use crate::context::{entity_id, SimContext};
use crate::formation::radial_rotation;
use crate::systems::aim;
use crate::timers::{TimerAction, TimerKey};

/// Outcome of a trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Fired,
    Rejected(RejectReason),
}

impl Activation {
    pub fn fired(self) -> bool {
        self == Activation::Fired
    }
}

/// Trigger the primary action of the ability in `slot`.
pub fn activate(world: &mut World, ctx: &mut SimContext, player: Entity, slot: usize) -> Activation {
    let (kind, ready) = match ability_at(world, player, slot) {
        Ok(found) => found,
        Err(reason) => return reject(player, slot, reason),
    };
    if is_stunned(world, player) {
        return reject(player, slot, RejectReason::Stunned);
    }
    if !kind.has(Capability::Active) && !kind.has(Capability::Toggleable) {
        return reject(player, slot, RejectReason::Unsupported);
    }
    if !ready {
        return reject(player, slot, RejectReason::OnCooldown);
    }

    let result = match kind {
        AbilityKind::Shoot => shoot(world, &ctx.area, player),
        AbilityKind::ChangeStance { stance } => toggle_stance(world, player, slot, stance),
        AbilityKind::CombineOrbs {
            orb_cost,
            normal_orb_cost,
        } => combine(world, player, orb_cost, normal_orb_cost),
        AbilityKind::Teleport => teleport(world, ctx, player),
        AbilityKind::UltimateShoot => ultimate(world, &ctx.area, player),
    };

    match result {
        Ok(()) => {
            if let Ok(mut loadout) = world.get::<&mut Loadout>(player) {
                if let Some(ability) = loadout.abilities.get_mut(slot) {
                    ability.enter_cooldown();
                }
            }
            ctx.emit(SimEvent::AbilityActivated {
                player: entity_id(player),
                kind,
            });
            Activation::Fired
        }
        Err(reason) => reject(player, slot, reason),
    }
}

/// Trigger the secondary action of a double-active ability.
pub fn activate_secondary(world: &World, player: Entity, slot: usize) -> Activation {
    let kind = match ability_at(world, player, slot) {
        Ok((kind, _)) => kind,
        Err(reason) => return reject(player, slot, reason),
    };
    if is_stunned(world, player) {
        return reject(player, slot, RejectReason::Stunned);
    }
    // No stock ability carries a secondary action.
    debug_assert!(!kind.has(Capability::DoubleActive));
    reject(player, slot, RejectReason::Unsupported)
}

/// Apply the standing effects of every passive ability. Run once on spawn.
pub fn apply_passives(world: &mut World, player: Entity) {
    let kinds: Vec<AbilityKind> = match world.get::<&Loadout>(player) {
        Ok(loadout) => loadout
            .abilities
            .iter()
            .map(|a| a.kind)
            .filter(|k| k.has(Capability::Passive))
            .collect(),
        Err(_) => return,
    };
    for kind in kinds {
        match kind {
            // Shooting has no standing modifier.
            AbilityKind::Shoot => {}
            other => log::trace!("{:?} has no passive effect", other),
        }
    }
}

/// Count down every ability cooldown by `dt` seconds.
pub fn tick_cooldowns(world: &mut World, dt: f64) {
    for (_entity, loadout) in world.query_mut::<&mut Loadout>() {
        for ability in &mut loadout.abilities {
            ability.tick_cooldown(dt);
        }
    }
}

/// Loadout slots whose abilities can be actively triggered.
pub fn active_slots(loadout: &Loadout) -> Vec<usize> {
    loadout
        .abilities
        .iter()
        .enumerate()
        .filter(|(_, a)| a.kind.has(Capability::Active))
        .map(|(slot, _)| slot)
        .collect()
}

/// A point well outside the play area on the ray from `from` through `through`.
pub fn exit_destination(from: Vec2, through: Vec2, area: &PlayArea) -> Vec2 {
    let delta = through - from;
    let mut scale: f64 = 0.0;
    if delta.y != 0.0 {
        scale = scale.max(area.height / delta.y.abs());
    }
    if delta.x != 0.0 {
        scale = scale.max(area.width / delta.x.abs());
    }
    if scale == 0.0 {
        return from + Vec2::X * area.width;
    }
    from + delta * scale
}

/// Release an orb toward `through` and past the edge of the play area.
pub fn launch(orb: &mut Orb, through: Vec2, area: &PlayArea) {
    let destination = exit_destination(orb.position, through, area);
    orb.destination = Some(destination);
    orb.rotation = radial_rotation(destination - orb.position);
    orb.stretched = true;
    orb.state = OrbState::InFlight;
}

fn reject(player: Entity, slot: usize, reason: RejectReason) -> Activation {
    log::trace!("player {} slot {} rejected: {:?}", entity_id(player), slot, reason);
    Activation::Rejected(reason)
}

fn ability_at(world: &World, player: Entity, slot: usize) -> Result<(AbilityKind, bool), RejectReason> {
    let loadout = world
        .get::<&Loadout>(player)
        .map_err(|_| RejectReason::NoSuchAbility)?;
    let ability = loadout.abilities.get(slot).ok_or(RejectReason::NoSuchAbility)?;
    Ok((ability.kind, ability.is_ready()))
}

fn is_stunned(world: &World, player: Entity) -> bool {
    world.get::<&Player>(player).map(|p| p.is_stunned()).unwrap_or(false)
}

fn shoot(world: &mut World, area: &PlayArea, player: Entity) -> Result<(), RejectReason> {
    let (aim, orb) = {
        let mut p = world
            .get::<&mut Player>(player)
            .map_err(|_| RejectReason::NoSuchAbility)?;
        let orb = p.orbs.pop().ok_or(RejectReason::InsufficientOrbs)?;
        (p.aim, orb)
    };
    if let Ok(mut orb) = world.get::<&mut Orb>(orb) {
        launch(&mut orb, aim, area);
    }
    Ok(())
}

fn toggle_stance(world: &mut World, player: Entity, slot: usize, stance: StanceKind) -> Result<(), RejectReason> {
    let toggle = world
        .get::<&Loadout>(player)
        .ok()
        .and_then(|l| l.abilities.get(slot).map(|a| a.toggle))
        .ok_or(RejectReason::NoSuchAbility)?;

    let next = {
        let mut p = world
            .get::<&mut Player>(player)
            .map_err(|_| RejectReason::NoSuchAbility)?;
        let (stance, next) = match toggle {
            Toggle::Off => (stance, Toggle::On),
            Toggle::On => (StanceKind::default(), Toggle::Off),
        };
        let mobility = p.mobility_modifier - p.stance.passive_mobility() + stance.passive_mobility();
        p.mobility_modifier = mobility;
        p.stance = stance;
        next
    };

    if let Ok(mut loadout) = world.get::<&mut Loadout>(player) {
        if let Some(ability) = loadout.abilities.get_mut(slot) {
            ability.toggle = next;
        }
    }
    Ok(())
}

fn combine(world: &mut World, player: Entity, orb_cost: usize, normal_orb_cost: usize) -> Result<(), RejectReason> {
    let orbs = world
        .get::<&Player>(player)
        .map(|p| p.orbs.clone())
        .map_err(|_| RejectReason::NoSuchAbility)?;
    if orbs.len() < orb_cost || orb_cost < 2 {
        return Err(RejectReason::InsufficientOrbs);
    }

    let mut radii = Vec::with_capacity(orbs.len());
    let mut normal = 0;
    for &orb in &orbs {
        let o = world.get::<&Orb>(orb).map_err(|_| RejectReason::InsufficientOrbs)?;
        radii.push(o.radius);
        if o.effects.is_empty() {
            normal += 1;
        }
    }
    if normal < normal_orb_cost {
        return Err(RejectReason::InsufficientOrbs);
    }

    // Oversized top orb: grow the one below instead, if it has company.
    let mut receiver_index = orbs.len() - 1;
    if radii[receiver_index] >= COMBINE_RECEIVER_RADIUS_CAP && receiver_index >= 2 {
        receiver_index -= 1;
    }
    let donor_count = orb_cost - 1;
    if receiver_index < donor_count {
        return Err(RejectReason::InsufficientOrbs);
    }
    let receiver = orbs[receiver_index];
    let donors = &orbs[receiver_index - donor_count..receiver_index];

    for &donor in donors {
        if let Ok(mut o) = world.get::<&mut Orb>(donor) {
            o.speed *= COMBINE_DONOR_SPEED_FACTOR;
            o.state = OrbState::Merging { receiver };
        }
    }
    if let Ok(mut p) = world.get::<&mut Player>(player) {
        p.orbs.retain(|e| !donors.contains(e));
    }
    Ok(())
}

fn teleport(world: &mut World, ctx: &mut SimContext, player: Entity) -> Result<(), RejectReason> {
    let orbs = {
        let mut p = world
            .get::<&mut Player>(player)
            .map_err(|_| RejectReason::NoSuchAbility)?;
        if p.orbs.is_empty() {
            return Err(RejectReason::InsufficientOrbs);
        }
        let jump = Vec2::from_heading(p.moving_direction.heading()) * TELEPORT_DISTANCE;
        let radius = p.radius();
        p.position = ctx.area.clamp_inside(p.position + jump, radius);
        p.orbs.clone()
    };

    let expires = ctx.now + TELEPORT_INVULNERABILITY_SECS;
    for orb in orbs {
        if let Ok(mut o) = world.get::<&mut Orb>(orb) {
            o.effects.insert(Effect::Invulnerable);
            ctx.timers.schedule_keyed(
                expires,
                TimerKey::OrbEffect(orb, Effect::Invulnerable),
                TimerAction::ExpireOrbEffect {
                    orb,
                    effect: Effect::Invulnerable,
                },
            );
        }
    }
    Ok(())
}

fn ultimate(world: &mut World, area: &PlayArea, player: Entity) -> Result<(), RejectReason> {
    let has_orbs = world
        .get::<&Player>(player)
        .map(|p| !p.orbs.is_empty())
        .map_err(|_| RejectReason::NoSuchAbility)?;
    if !has_orbs {
        return Err(RejectReason::InsufficientOrbs);
    }
    let (target, target_position) = aim::closest_opponent(world, area, player).ok_or(RejectReason::NoTarget)?;

    let orbs = match world.get::<&mut Player>(player) {
        Ok(mut p) => std::mem::take(&mut p.orbs),
        Err(_) => return Err(RejectReason::NoSuchAbility),
    };
    for orb in orbs {
        if let Ok(mut o) = world.get::<&mut Orb>(orb) {
            launch(&mut o, target_position, area);
            o.state = OrbState::Homing { target };
        }
    }
    Ok(())
}
