//! Steering for orbs that are not held: homing ultimate orbs and combine
//! donors merging into their receiver.

use hecs::{Entity, World};

use orbs_core::components::{Orb, OrbState, Player};
use orbs_core::constants::COMBINE_MERGE_DISTANCE_FACTOR;
use orbs_core::enums::{Effect, OrbDestroyCause};

use crate::abilities::exit_destination;
use crate::context::SimContext;
use crate::formation::radial_rotation;
use crate::timers::TimerKey;
use crate::world_setup::{adopt_orb, destroy_orb};

pub fn run(world: &mut World, ctx: &mut SimContext) {
    let steered: Vec<(Entity, OrbState, Option<Entity>)> = world
        .query::<&Orb>()
        .iter()
        .filter(|(_, o)| matches!(o.state, OrbState::Homing { .. } | OrbState::Merging { .. }))
        .map(|(e, o)| (e, o.state, o.owner))
        .collect();

    for (orb, state, owner) in steered {
        match state {
            OrbState::Homing { target } => home(world, ctx, orb, target, owner),
            OrbState::Merging { receiver } => merge(world, ctx, orb, receiver, owner),
            OrbState::Held | OrbState::InFlight => {}
        }
    }
}

fn home(world: &mut World, ctx: &SimContext, orb: Entity, target: Entity, owner: Option<Entity>) {
    let target_position = world.get::<&Player>(target).map(|p| p.position).ok();
    if let Some(target_position) = target_position {
        if let Ok(mut o) = world.get::<&mut Orb>(orb) {
            let destination = exit_destination(o.position, target_position, &ctx.area);
            o.destination = Some(destination);
            o.rotation = radial_rotation(destination - o.position);
        }
        return;
    }

    match owner.filter(|&e| world.contains(e)) {
        // Recall; retried every frame while the shooter is full.
        Some(owner) => {
            adopt_orb(world, owner, orb);
        }
        None => {
            if let Ok(mut o) = world.get::<&mut Orb>(orb) {
                o.state = OrbState::InFlight;
            }
        }
    }
}

fn merge(world: &mut World, ctx: &mut SimContext, donor: Entity, receiver: Entity, owner: Option<Entity>) {
    let receiver_body = world
        .get::<&Orb>(receiver)
        .map(|r| (r.position, r.radius, r.team, r.owner))
        .ok();
    let Some((receiver_position, receiver_radius, receiver_team, receiver_owner)) = receiver_body else {
        let returned = owner.is_some_and(|owner| adopt_orb(world, owner, donor));
        if !returned {
            destroy_orb(world, ctx, donor, OrbDestroyCause::Orphaned);
        }
        return;
    };

    // The receiver changed hands (owner killed or robbed): the donor follows it.
    let donor_team = world.get::<&Orb>(donor).map(|o| o.team).ok();
    if donor_team.is_some_and(|team| team != receiver_team) {
        let rehomed = receiver_owner.is_some_and(|new_owner| adopt_orb(world, new_owner, donor));
        if !rehomed {
            destroy_orb(world, ctx, donor, OrbDestroyCause::Orphaned);
        }
        return;
    }

    let (distance, radius, mut effects) = match world.get::<&mut Orb>(donor) {
        Ok(mut o) => {
            o.destination = Some(receiver_position);
            (o.position.distance(receiver_position), o.radius, o.effects.clone())
        }
        Err(_) => return,
    };
    if distance >= receiver_radius * COMBINE_MERGE_DISTANCE_FACTOR {
        return;
    }

    // Post-teleport invulnerability expires with its own timer.
    if ctx.timers.is_pending(TimerKey::OrbEffect(donor, Effect::Invulnerable)) {
        effects.remove(Effect::Invulnerable);
    }
    if let Ok(mut r) = world.get::<&mut Orb>(receiver) {
        r.radius += radius;
        r.effects.absorb(&effects);
    }
    destroy_orb(world, ctx, donor, OrbDestroyCause::Absorbed);
}
