//! Stance system: assigns each held orb its formation slot.

use hecs::{Entity, World};

use orbs_core::components::{Orb, Player};
use orbs_core::constants::DAMAGE_BOOST_THRESHOLD;
use orbs_core::types::{Vec2, VectorExt};

use crate::formation::{formation_for, radial_rotation, FormationInput};

struct Assignment {
    orbs: Vec<Entity>,
    center: Vec2,
    offsets: Vec<Vec2>,
    boosted: bool,
}

/// Place every non-stunned player's orbs. Stunned players' orbs stay frozen.
pub fn run(world: &mut World, frame_scale: f64) {
    let mut assignments = Vec::new();
    for (_entity, player) in world.query_mut::<&mut Player>() {
        if player.is_stunned() || player.orbs.is_empty() {
            continue;
        }
        let input = FormationInput {
            orb_count: player.orbs.len(),
            player_radius: player.radius(),
            orbs_per_layer: player.orbs_per_layer,
            reference_angle: player.reference_angle,
            aim_heading: player.close_aim().heading(),
        };
        let placement = formation_for(player.stance).arrange(&input, frame_scale);
        player.reference_angle = placement.reference_angle;
        assignments.push(Assignment {
            orbs: player.orbs.clone(),
            center: player.position,
            offsets: placement.offsets,
            boosted: player.damage_modifier >= DAMAGE_BOOST_THRESHOLD,
        });
    }

    for assignment in assignments {
        for (orb, offset) in assignment.orbs.iter().zip(&assignment.offsets) {
            if let Ok(mut o) = world.get::<&mut Orb>(*orb) {
                o.destination = Some(assignment.center + *offset);
                o.rotation = radial_rotation(o.position - assignment.center);
                o.stretched = false;
                o.damage_boosted = assignment.boosted;
            }
        }
    }
}
