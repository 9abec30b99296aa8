//! Aim system: points every player at its closest visible opponent.

use hecs::{Entity, World};

use orbs_core::components::Player;
use orbs_core::constants::AIM_FALLBACK_DISTANCE;
use orbs_core::types::{PlayArea, Vec2};

/// Closest opponent of `player` that overlaps the play area.
pub fn closest_opponent(world: &World, area: &PlayArea, player: Entity) -> Option<(Entity, Vec2)> {
    let (team, position) = {
        let p = world.get::<&Player>(player).ok()?;
        (p.team, p.position)
    };
    let opponent = team.opponent();

    let mut best: Option<(Entity, Vec2, f64)> = None;
    let mut query = world.query::<&Player>();
    for (entity, other) in query.iter() {
        if other.team != opponent || !area.contains(other.position, other.radius()) {
            continue;
        }
        let distance = other.position.distance(position);
        if best.is_none_or(|(_, _, d)| distance < d) {
            best = Some((entity, other.position, distance));
        }
    }
    best.map(|(entity, pos, _)| (entity, pos))
}

/// Update every player's aim: the closest visible opponent, or a point
/// ahead along the moving direction when none is visible.
pub fn run(world: &mut World, area: &PlayArea) {
    let players: Vec<Entity> = world.query::<&Player>().iter().map(|(e, _)| e).collect();
    let updates: Vec<(Entity, Option<Vec2>)> = players
        .into_iter()
        .map(|player| (player, closest_opponent(world, area, player).map(|(_, target)| target)))
        .collect();
    for (player, target) in updates {
        if let Ok(mut p) = world.get::<&mut Player>(player) {
            let fallback = p.position + p.moving_direction * AIM_FALLBACK_DISTANCE;
            p.aim = target.unwrap_or(fallback);
        }
    }
}
