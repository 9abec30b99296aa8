//! Spawner system: timed enemy generation.

use hecs::{Entity, World};

use orbs_core::components::Spawner;
use orbs_core::events::SimEvent;
use orbs_procgen::blueprint;

use crate::context::{entity_id, SimContext};
use crate::world_setup::{self, PlayerSpawn};

/// Advance every spawner by `dt`. A spawner whose counter reached its
/// interval spawns one enemy, resets, and spends a charge; spawners without
/// charges are removed.
pub fn run(world: &mut World, ctx: &mut SimContext, dt: f64) {
    let mut due: Vec<(Entity, u8)> = Vec::new();
    for (entity, spawner) in world.query_mut::<&mut Spawner>() {
        if spawner.counter >= spawner.interval_secs {
            spawner.counter = 0.0;
            spawner.charges = spawner.charges.saturating_sub(1);
            due.push((entity, spawner.level));
        } else {
            spawner.counter += dt;
        }
    }

    for (entity, level) in due {
        let Ok((position, charges)) = world.get::<&Spawner>(entity).map(|s| (s.position, s.charges)) else {
            continue;
        };
        match ctx.content.spawner_level(level).cloned() {
            Some(spec) => {
                let blueprint = blueprint::generate(&spec, &ctx.content, &mut ctx.rng);
                world_setup::spawn_player(world, ctx, PlayerSpawn::enemy(blueprint, position));
            }
            None => log::warn!("spawner {} has unknown level {}", entity_id(entity), level),
        }

        if charges == 0 {
            let _ = world.despawn(entity);
            log::debug!("spawner {} exhausted", entity_id(entity));
            ctx.emit(SimEvent::SpawnerExhausted {
                id: entity_id(entity),
                position,
            });
        }
    }
}
