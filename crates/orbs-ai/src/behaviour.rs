//! Enemy behaviour evaluation.
//!
//! Seekers walk straight at their target. Ranged enemies advance or retreat
//! to hold a preferred distance, strafe sideways in a randomly re-rolled
//! direction, and fire their active abilities at random while visible.
//! No ECS dependency: operates on plain data.

use rand::Rng;

use orbs_core::constants::{AI_ABILITY_CHANCE, JUKE_CHANCE};
use orbs_core::enums::{Behaviour, JukeDirection};
use orbs_core::types::{Vec2, VectorExt};

use crate::profiles::get_profile;

const JUKE_CHOICES: [JukeDirection; 4] = [
    JukeDirection::None,
    JukeDirection::None,
    JukeDirection::Left,
    JukeDirection::Right,
];

/// Input to the behaviour evaluator for a single enemy.
pub struct BehaviourContext<'a> {
    pub behaviour: Behaviour,
    pub juke: JukeDirection,
    pub getting_closer: bool,
    pub position: Vec2,
    pub moving_direction: Vec2,
    /// Closest visible opponent, or the player's forward aim point.
    pub target: Vec2,
    /// Whether the enemy is close to the play-area border.
    pub near_border: bool,
    /// Whether the enemy overlaps the play area.
    pub visible: bool,
    /// Loadout slots of abilities that can be actively triggered.
    pub active_slots: &'a [usize],
}

/// Output from the behaviour evaluator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviourUpdate {
    /// Sideways movement input, applied first.
    pub strafe: Option<Vec2>,
    /// Toward/away movement input, applied second.
    pub advance: Option<Vec2>,
    pub juke: JukeDirection,
    pub getting_closer: bool,
    /// Loadout slots to trigger this tick.
    pub triggers: Vec<usize>,
}

/// Evaluate one enemy for one tick.
pub fn evaluate<R: Rng + ?Sized>(ctx: &BehaviourContext<'_>, rng: &mut R) -> BehaviourUpdate {
    let mut update = BehaviourUpdate {
        juke: ctx.juke,
        getting_closer: ctx.getting_closer,
        ..Default::default()
    };

    let Some(profile) = get_profile(ctx.behaviour) else {
        return update;
    };

    let to_target = ctx.target - ctx.position;
    let heading = to_target.normalized_or_zero();

    let Some(range) = profile.preferred_distance else {
        update.advance = non_zero(heading * profile.speed);
        return update;
    };

    if profile.strafes {
        if rng.gen_bool(JUKE_CHANCE) {
            update.juke = JUKE_CHOICES[rng.gen_range(0..JUKE_CHOICES.len())];
        }
        update.strafe = strafe_vector(update.juke, ctx.moving_direction, ctx.getting_closer)
            .map(|v| v.normalized_or_zero() * profile.speed)
            .and_then(non_zero);
    }

    let distance = to_target.length();
    if distance > range {
        update.advance = non_zero(heading * profile.speed);
        update.getting_closer = true;
    } else if distance < range && !ctx.near_border {
        update.advance = non_zero(heading * -profile.speed);
        update.getting_closer = false;
    }

    if profile.fires_abilities && ctx.visible {
        update.triggers = ctx
            .active_slots
            .iter()
            .copied()
            .filter(|_| rng.gen_bool(AI_ABILITY_CHANCE))
            .collect();
    }

    update
}

/// Sideways direction for a juke. Which perpendicular counts as "left"
/// flips with whether the enemy is currently closing in.
fn strafe_vector(juke: JukeDirection, moving_direction: Vec2, getting_closer: bool) -> Option<Vec2> {
    match juke {
        JukeDirection::None => None,
        JukeDirection::Left => Some(if getting_closer {
            moving_direction.perpendicular_clockwise()
        } else {
            moving_direction.perpendicular_counter_clockwise()
        }),
        JukeDirection::Right => Some(if getting_closer {
            moving_direction.perpendicular_counter_clockwise()
        } else {
            moving_direction.perpendicular_clockwise()
        }),
    }
}

fn non_zero(v: Vec2) -> Option<Vec2> {
    (v != Vec2::ZERO).then_some(v)
}
