//! Movement: player displacement from input velocities and orb seeking.
//!
//! Speeds are expressed per reference frame and scaled by `frame_scale`.

use hecs::{Entity, World};

use orbs_core::components::{MainPlayer, Orb, Player};
use orbs_core::constants::{JOYSTICK_REACH, ORB_MAX_SPEED_FACTOR, ORB_SPEED_DISTANCE_DIVISOR};
use orbs_core::types::{PlayArea, Vec2, VectorExt};

/// Move a player by an input velocity.
///
/// The step shrinks with health and grows with the mobility modifier.
/// Blue players are clamped inside the play area; red players walk in
/// from outside and are never clamped.
pub fn move_player(player: &mut Player, velocity: Vec2, area: &PlayArea, frame_scale: f64) {
    if player.is_stunned() || velocity == Vec2::ZERO {
        return;
    }
    let mobility = (1.0 + player.mobility_modifier / 100.0).max(0.0);
    let step = velocity * player.movement_multiplier() * mobility * frame_scale;
    let radius = player.radius();
    player.moving_direction = velocity.normalized_or_zero() * radius * 2.0;

    let next = player.position + step;
    player.position = if player.team.may_leave_play_area() {
        next
    } else {
        area.clamp_inside(next, radius)
    };
}

/// Apply the joystick direction to the main player. `direction` is clamped
/// to unit length.
pub fn move_main_player(world: &mut World, direction: Vec2, area: &PlayArea, frame_scale: f64) {
    let velocity = direction.clamp_length_max(1.0) * JOYSTICK_REACH;
    for (_entity, (player, _main)) in world.query_mut::<(&mut Player, &MainPlayer)>() {
        move_player(player, velocity, area, frame_scale);
    }
}

/// Apply a velocity to one player entity.
pub fn move_entity(world: &mut World, entity: Entity, velocity: Vec2, area: &PlayArea, frame_scale: f64) {
    if let Ok(mut player) = world.get::<&mut Player>(entity) {
        move_player(&mut player, velocity, area, frame_scale);
    }
}

/// Step one orb toward its destination.
///
/// Speed grows with the remaining distance, up to a cap, and snaps onto the
/// destination once it is closer than one base step.
pub fn step_orb(orb: &mut Orb, frame_scale: f64) {
    let Some(destination) = orb.destination else {
        return;
    };
    let offset = destination - orb.position;
    let distance = offset.length();
    if distance == 0.0 {
        return;
    }
    if distance < orb.speed {
        orb.position = destination;
        return;
    }
    let speed = (orb.speed * distance / ORB_SPEED_DISTANCE_DIVISOR).min(orb.speed * ORB_MAX_SPEED_FACTOR);
    let step = (speed * frame_scale).min(distance);
    orb.position += offset / distance * step;
}

/// Move every orb.
pub fn run_orbs(world: &mut World, frame_scale: f64) {
    for (_entity, orb) in world.query_mut::<&mut Orb>() {
        step_orb(orb, frame_scale);
    }
}
