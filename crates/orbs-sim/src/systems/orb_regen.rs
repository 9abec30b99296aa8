//! Orb regeneration: players below capacity grow one orb per interval.

use hecs::{Entity, World};

use orbs_core::components::{EffectSet, Player};

use crate::world_setup;

pub fn run(world: &mut World, dt: f64) {
    let mut due: Vec<Entity> = Vec::new();
    for (entity, player) in world.query_mut::<&mut Player>() {
        if player.is_full() {
            continue;
        }
        if player.orb_regen_counter >= player.orb_regen_interval() {
            player.orb_regen_counter = 0.0;
            due.push(entity);
        } else {
            player.orb_regen_counter += dt;
        }
    }
    for entity in due {
        world_setup::spawn_orbs(world, entity, 1, &EffectSet::new());
    }
}
