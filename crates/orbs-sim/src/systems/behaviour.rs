//! Enemy behaviour system: feeds world state into the AI evaluator and
//! applies its movement and ability triggers.

use hecs::{Entity, World};

use orbs_ai::behaviour::{evaluate, BehaviourContext};
use orbs_core::components::{Loadout, Player};
use orbs_core::constants::AIM_FALLBACK_DISTANCE;
use orbs_core::enums::{Behaviour, JukeDirection};
use orbs_core::types::Vec2;

use crate::abilities;
use crate::context::SimContext;
use crate::systems::aim::closest_opponent;
use crate::systems::movement::move_entity;

struct Agent {
    entity: Entity,
    behaviour: Behaviour,
    juke: JukeDirection,
    getting_closer: bool,
    position: Vec2,
    moving_direction: Vec2,
    radius: f64,
    slots: Vec<usize>,
}

pub fn run(world: &mut World, ctx: &mut SimContext, frame_scale: f64) {
    let agents: Vec<Agent> = world
        .query::<(&Player, &Loadout)>()
        .iter()
        .filter(|(_, (p, _))| p.behaviour != Behaviour::None)
        .map(|(entity, (p, loadout))| Agent {
            entity,
            behaviour: p.behaviour,
            juke: p.juke,
            getting_closer: p.getting_closer,
            position: p.position,
            moving_direction: p.moving_direction,
            radius: p.radius(),
            slots: abilities::active_slots(loadout),
        })
        .collect();

    for agent in agents {
        let target = closest_opponent(world, &ctx.area, agent.entity)
            .map(|(_, position)| position)
            .unwrap_or(agent.position + agent.moving_direction * AIM_FALLBACK_DISTANCE);

        let input = BehaviourContext {
            behaviour: agent.behaviour,
            juke: agent.juke,
            getting_closer: agent.getting_closer,
            position: agent.position,
            moving_direction: agent.moving_direction,
            target,
            near_border: ctx.area.is_near_border(agent.position, agent.radius),
            visible: ctx.area.contains(agent.position, agent.radius),
            active_slots: &agent.slots,
        };
        let update = evaluate(&input, &mut ctx.rng);

        if let Ok(mut p) = world.get::<&mut Player>(agent.entity) {
            p.juke = update.juke;
            p.getting_closer = update.getting_closer;
        }
        if let Some(strafe) = update.strafe {
            move_entity(world, agent.entity, strafe, &ctx.area, frame_scale);
        }
        if let Some(advance) = update.advance {
            move_entity(world, agent.entity, advance, &ctx.area, frame_scale);
        }
        for slot in update.triggers {
            abilities::activate(world, ctx, agent.entity, slot);
        }
    }
}
