//! Contact detection and resolution.
//!
//! Overlaps are detected geometrically each frame. A pair is resolved only
//! on the frame it begins touching, in pair-key order, and every resolution
//! re-checks that both bodies still exist.

use std::collections::BTreeSet;

use hecs::{Entity, World};
use rand::Rng;

use orbs_core::components::*;
use orbs_core::constants::*;
use orbs_core::enums::*;
use orbs_core::events::SimEvent;
use orbs_core::types::Vec2;

use crate::context::{entity_id, SimContext};
use crate::power_ups;
use crate::timers::{TimerAction, TimerKey};
use crate::world_setup::{destroy_orb, kill_player, transfer_orbs};

/// A touching pair, lower category first. Same-category pairs are ordered
/// by entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContactKey {
    pub first_category: ContactCategory,
    pub first_id: u64,
    pub second_category: ContactCategory,
    pub second_id: u64,
    pub first: Entity,
    pub second: Entity,
}

impl ContactKey {
    pub fn new(a: (ContactCategory, Entity), b: (ContactCategory, Entity)) -> Self {
        let key_a = (a.0, entity_id(a.1));
        let key_b = (b.0, entity_id(b.1));
        let (first, second) = if key_a <= key_b { (a, b) } else { (b, a) };
        Self {
            first_category: first.0,
            first_id: entity_id(first.1),
            second_category: second.0,
            second_id: entity_id(second.1),
            first: first.1,
            second: second.1,
        }
    }
}

/// Pairs that were touching at the end of the previous frame.
#[derive(Debug, Default)]
pub struct ContactTracker {
    active: BTreeSet<ContactKey>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect overlaps and return the pairs that started touching this
    /// frame, in key order.
    pub fn begin_contacts(&mut self, world: &World) -> Vec<ContactKey> {
        let current = detect(world);
        let began = current.difference(&self.active).copied().collect();
        self.active = current;
        began
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Detect and resolve this frame's new contacts.
pub fn run(world: &mut World, ctx: &mut SimContext, tracker: &mut ContactTracker) {
    for key in tracker.begin_contacts(world) {
        if !world.contains(key.first) || !world.contains(key.second) {
            continue;
        }
        match (key.first_category, key.second_category) {
            (ContactCategory::Player, ContactCategory::Orb) => hit_player(world, ctx, key.first, key.second),
            (ContactCategory::Player, ContactCategory::Pickup) => collect(world, ctx, key.first, key.second),
            (ContactCategory::Orb, ContactCategory::Orb) => clash(world, ctx, key.first, key.second),
            _ => {}
        }
    }
}

fn circles_overlap(a: Vec2, ra: f64, b: Vec2, rb: f64) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

fn circle_overlaps_box(center: Vec2, radius: f64, box_center: Vec2, half: f64) -> bool {
    let min = box_center - Vec2::splat(half);
    let max = box_center + Vec2::splat(half);
    let closest = center.clamp(min, max);
    closest.distance_squared(center) < radius * radius
}

fn detect(world: &World) -> BTreeSet<ContactKey> {
    let players: Vec<(Entity, Team, Vec2, f64, bool)> = world
        .query::<(&Player, Option<&MainPlayer>)>()
        .iter()
        .map(|(e, (p, main))| (e, p.team, p.position, p.radius(), main.is_some()))
        .collect();
    let orbs: Vec<(Entity, Team, Vec2, f64)> = world
        .query::<&Orb>()
        .iter()
        .map(|(e, o)| (e, o.team, o.position, o.radius))
        .collect();
    let pickups: Vec<(Entity, Vec2)> = world
        .query::<&PowerUpPickup>()
        .iter()
        .map(|(e, p)| (e, p.position))
        .collect();

    let mut contacts = BTreeSet::new();

    for (i, &(a, team_a, pos_a, r_a)) in orbs.iter().enumerate() {
        for &(b, team_b, pos_b, r_b) in &orbs[i + 1..] {
            if team_a != team_b && circles_overlap(pos_a, r_a, pos_b, r_b) {
                contacts.insert(ContactKey::new((ContactCategory::Orb, a), (ContactCategory::Orb, b)));
            }
        }
    }

    for &(player, team, position, radius, is_main) in &players {
        for &(orb, orb_team, orb_position, orb_radius) in &orbs {
            if orb_team != team && circles_overlap(position, radius, orb_position, orb_radius) {
                contacts.insert(ContactKey::new(
                    (ContactCategory::Player, player),
                    (ContactCategory::Orb, orb),
                ));
            }
        }
        if !is_main {
            continue;
        }
        for &(pickup, pickup_position) in &pickups {
            if circle_overlaps_box(position, radius, pickup_position, POWER_UP_SIZE / 4.0) {
                contacts.insert(ContactKey::new(
                    (ContactCategory::Player, player),
                    (ContactCategory::Pickup, pickup),
                ));
            }
        }
    }

    contacts
}

/// Orb against orb of another team. Equal orbs annihilate; otherwise the
/// larger one loses the smaller one's radius and the smaller one is destroyed.
fn clash(world: &mut World, ctx: &mut SimContext, a: Entity, b: Entity) {
    let body = |e: Entity| {
        world
            .get::<&Orb>(e)
            .map(|o| (o.team, o.radius, o.is_invulnerable(), o.position))
            .ok()
    };
    let (Some((team_a, radius_a, inv_a, pos_a)), Some((team_b, radius_b, inv_b, pos_b))) = (body(a), body(b)) else {
        return;
    };
    if team_a == team_b {
        return;
    }
    ctx.emit(SimEvent::Contact {
        kind: ContactKind::OrbOrb,
        position: (pos_a + pos_b) / 2.0,
    });

    if radius_a == radius_b {
        if !inv_a {
            destroy_orb(world, ctx, a, OrbDestroyCause::Combat);
        }
        if !inv_b {
            destroy_orb(world, ctx, b, OrbDestroyCause::Combat);
        }
        return;
    }

    let (big, small, small_radius, small_invulnerable) = if radius_a > radius_b {
        (a, b, radius_b, inv_b)
    } else {
        (b, a, radius_a, inv_a)
    };
    if let Ok(mut o) = world.get::<&mut Orb>(big) {
        o.radius = (o.radius - small_radius).max(ORB_DEFAULT_RADIUS);
    }
    if !small_invulnerable {
        destroy_orb(world, ctx, small, OrbDestroyCause::Combat);
    }
}

/// Orb against player of another team.
fn hit_player(world: &mut World, ctx: &mut SimContext, victim: Entity, orb: Entity) {
    let Ok((orb_team, radius, owner, effects, invulnerable, orb_position)) = world
        .get::<&Orb>(orb)
        .map(|o| (o.team, o.radius, o.owner, o.effects.clone(), o.is_invulnerable(), o.position))
    else {
        return;
    };
    let Ok((team, previous_health)) = world.get::<&Player>(victim).map(|p| (p.team, p.health)) else {
        return;
    };
    if orb_team == team || orb_team == Team::None {
        return;
    }

    let shooter = owner.filter(|&e| e != victim && world.contains(e));
    let shooter_modifier = shooter
        .and_then(|e| world.get::<&Player>(e).ok().map(|p| p.damage_modifier))
        .unwrap_or(0);
    let spread = ctx.damage_spread_percent.max(0);
    let roll = if spread > 0 {
        ctx.rng.gen_range(-spread..=spread)
    } else {
        0
    };
    let damage = modified_damage(base_damage(radius), roll + shooter_modifier);
    let health = previous_health - damage;

    let victim_position = match world.get::<&mut Player>(victim) {
        Ok(mut p) => {
            p.health = health;
            p.position
        }
        Err(_) => return,
    };
    log::trace!("player {} hit for {} ({} left)", entity_id(victim), damage, health);
    ctx.emit(SimEvent::PlayerHit {
        id: entity_id(victim),
        damage,
        health: health.max(0),
        position: victim_position,
    });
    ctx.emit(SimEvent::Contact {
        kind: ContactKind::OrbPlayer,
        position: orb_position,
    });

    apply_orb_effects(world, ctx, victim, shooter, &effects);

    if health == 0 {
        kill_player(world, ctx, victim, shooter);
        if !invulnerable {
            destroy_orb(world, ctx, orb, OrbDestroyCause::Combat);
        }
    } else if health < 0 {
        let decrease = f64::from(previous_health) * OVERKILL_SHRINK_FACTOR;
        if radius - decrease < ORB_DEFAULT_RADIUS {
            if !invulnerable {
                destroy_orb(world, ctx, orb, OrbDestroyCause::Combat);
            }
        } else if let Ok(mut o) = world.get::<&mut Orb>(orb) {
            o.radius -= decrease;
        }
        kill_player(world, ctx, victim, shooter);
    } else {
        if !invulnerable {
            destroy_orb(world, ctx, orb, OrbDestroyCause::Combat);
        }
        if let Ok(mut p) = world.get::<&mut Player>(victim) {
            p.clamp_health();
        }
    }
}

fn apply_orb_effects(
    world: &mut World,
    ctx: &mut SimContext,
    victim: Entity,
    shooter: Option<Entity>,
    effects: &EffectSet,
) {
    for effect in effects.iter() {
        match effect {
            Effect::Slowing => {
                if let Ok(mut p) = world.get::<&mut Player>(victim) {
                    p.mobility_modifier += SLOW_MOBILITY_PENALTY;
                }
                ctx.timers
                    .schedule(ctx.now + SLOW_DURATION_SECS, TimerAction::ExpireSlow { player: victim });
            }
            Effect::Stunning => {
                if let Ok(mut p) = world.get::<&mut Player>(victim) {
                    p.effects.insert(Effect::Stunning);
                }
                ctx.timers.schedule_keyed(
                    ctx.now + STUN_DURATION_SECS,
                    TimerKey::Stun(victim),
                    TimerAction::ExpireStun { player: victim },
                );
            }
            Effect::OrbStealing => {
                if let Some(shooter) = shooter {
                    transfer_orbs(world, victim, shooter, ORB_STEAL_COUNT);
                }
            }
            Effect::Invulnerable => {}
        }
    }
}

/// Main player picks up a power-up.
fn collect(world: &mut World, ctx: &mut SimContext, player: Entity, pickup: Entity) {
    let Ok(PowerUpPickup { kind, position }) = world.get::<&PowerUpPickup>(pickup).map(|p| *p) else {
        return;
    };
    let _ = world.despawn(pickup);
    power_ups::apply(world, ctx, player, kind);
    ctx.emit(SimEvent::Contact {
        kind: ContactKind::PickupPlayer,
        position,
    });
    ctx.emit(SimEvent::PowerUpCollected {
        id: entity_id(pickup),
        kind,
        message: kind.message().to_string(),
    });
}
