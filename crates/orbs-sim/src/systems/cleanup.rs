//! Cleanup system: removes orbs that have left the play area.

use hecs::{Entity, World};

use orbs_core::components::Orb;
use orbs_core::enums::OrbDestroyCause;

use crate::context::SimContext;
use crate::world_setup::destroy_orb;

/// Destroy orbs that were inside the play area and no longer overlap it.
/// Orbs created outside (enemies walking in) are kept until they first enter.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, ctx: &mut SimContext, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    let area = ctx.area;

    for (entity, orb) in world.query_mut::<&mut Orb>() {
        if area.contains(orb.position, orb.radius) {
            orb.was_inside = true;
        } else if orb.was_inside {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        destroy_orb(world, ctx, entity, OrbDestroyCause::OutOfBounds);
    }
}
