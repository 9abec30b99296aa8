//! Spawner layouts per difficulty tier and power-up placement.

use std::f64::consts::TAU;

use rand::Rng;

use orbs_core::constants::*;
use orbs_core::content::WaveLevels;
use orbs_core::enums::{PowerUpKind, SpawnerSide, WaveDifficulty};
use orbs_core::types::{PlayArea, Vec2, VectorExt};

use crate::weighted::pick;

/// Attempts at finding a reward spot away from the main player.
const REWARD_PLACEMENT_ATTEMPTS: usize = 32;

/// Where and what level to place one spawner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnerPlacement {
    pub level: u8,
    pub side: SpawnerSide,
    pub position: Vec2,
}

/// Sides that get a spawner for the given tier.
///
/// Easy waves use one side, medium waves an opposite pair, and the
/// hard wave a single boss spawner on any side.
pub fn sides_for<R: Rng + ?Sized>(difficulty: WaveDifficulty, rng: &mut R) -> Vec<SpawnerSide> {
    use SpawnerSide::*;
    match difficulty {
        WaveDifficulty::Easy => pick(&[Left, Right], rng).into_iter().collect(),
        WaveDifficulty::Medium => {
            if rng.gen_bool(0.5) {
                vec![Left, Right]
            } else {
                vec![Top, Bottom]
            }
        }
        WaveDifficulty::Hard => pick(&[Left, Right, Top, Bottom], rng).into_iter().collect(),
    }
}

/// Spawners for a new wave of the given tier.
pub fn spawners_for_wave<R: Rng + ?Sized>(
    difficulty: WaveDifficulty,
    levels: &WaveLevels,
    area: &PlayArea,
    rng: &mut R,
) -> Vec<SpawnerPlacement> {
    let level = match difficulty {
        WaveDifficulty::Easy => levels.easy,
        WaveDifficulty::Medium => levels.medium,
        WaveDifficulty::Hard => levels.hard,
    };
    sides_for(difficulty, rng)
        .into_iter()
        .map(|side| SpawnerPlacement {
            level,
            side,
            position: area.side_point(side, SPAWNER_SIDE_FRACTION),
        })
        .collect()
}

/// Roll the drop of a killed enemy: a random bonus thrown a short way off.
pub fn bonus_drop<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Option<(PowerUpKind, Vec2)> {
    if !rng.gen_bool(POWER_UP_DROP_CHANCE) {
        return None;
    }
    let kind = pick(&PowerUpKind::BONUSES, rng)?;
    let angle = rng.gen_range(0.0..TAU);
    let offset = Vec2::from_heading(angle) * POWER_UP_SIZE * POWER_UP_DROP_OFFSET_FACTOR;
    Some((kind, position + offset))
}

/// One to three upgrades in the central half of the area, clear of `avoid`.
pub fn wave_rewards<R: Rng + ?Sized>(area: &PlayArea, avoid: Vec2, rng: &mut R) -> Vec<(PowerUpKind, Vec2)> {
    let count = rng.gen_range(REWARD_MIN_COUNT..=REWARD_MAX_COUNT);
    (0..count)
        .filter_map(|_| {
            let kind = pick(&PowerUpKind::UPGRADES, rng)?;
            Some((kind, reward_position(area, avoid, rng)))
        })
        .collect()
}

fn reward_position<R: Rng + ?Sized>(area: &PlayArea, avoid: Vec2, rng: &mut R) -> Vec2 {
    let half_x = (area.width / 4.0 - POWER_UP_SIZE / 2.0).max(1.0);
    let half_y = (area.height / 4.0 - POWER_UP_SIZE / 2.0).max(1.0);
    let mut position = Vec2::ZERO;
    for _ in 0..REWARD_PLACEMENT_ATTEMPTS {
        position = Vec2::new(rng.gen_range(-half_x..=half_x), rng.gen_range(-half_y..=half_y));
        if position.distance(avoid) >= REWARD_MIN_DISTANCE {
            break;
        }
    }
    position
}
