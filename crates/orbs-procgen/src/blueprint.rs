//! Enemy blueprints generated per spawner level.

use rand::Rng;

use orbs_core::components::Ability;
use orbs_core::constants::*;
use orbs_core::content::{ContentTables, SpawnerLevelSpec};
use orbs_core::enums::{Behaviour, StanceKind};
use orbs_core::types::Vec2;

use crate::weighted::{pick, WeightedTable};

/// Everything needed to spawn one enemy.
#[derive(Debug, Clone)]
pub struct PlayerBlueprint {
    pub health: i32,
    pub orbs: usize,
    pub behaviour: Behaviour,
    pub stance: StanceKind,
    pub abilities: Vec<Ability>,
    /// Offset from the spawner position.
    pub offset: Vec2,
    pub is_boss: bool,
}

/// Generate an enemy for a spawner of the given level.
///
/// Boss levels always produce the fixed boss blueprint.
pub fn generate<R: Rng + ?Sized>(
    spec: &SpawnerLevelSpec,
    tables: &ContentTables,
    rng: &mut R,
) -> PlayerBlueprint {
    if spec.is_boss {
        return boss(tables);
    }

    let orbs = rng.gen_range(spec.orb_min..=spec.orb_max);

    let behaviour = if rng.gen_bool(0.5) {
        Behaviour::Seeker
    } else {
        let preferred_distance = pick(&RANGED_PREFERRED_DISTANCES, rng).unwrap_or(RANGED_PREFERRED_DISTANCES[0]);
        Behaviour::Ranged { preferred_distance }
    };

    let stance = if rng.gen_bool(SHIELD_STANCE_CHANCE) {
        StanceKind::Shield
    } else {
        StanceKind::Orbital
    };

    let abilities = WeightedTable::new(spec.loadout_weights.iter().map(|(name, w)| (name.as_str(), *w)))
        .map(|table| tables.instantiate_loadout(table.choose(rng)))
        .unwrap_or_default();

    log::trace!(
        "level {} blueprint: {} orbs, {:?}, {:?}",
        spec.level,
        orbs,
        behaviour,
        stance
    );

    PlayerBlueprint {
        health: spec.health,
        orbs,
        behaviour,
        stance,
        abilities,
        offset: spawn_offset(rng),
        is_boss: false,
    }
}

/// The fixed boss: a slow, tough orbital seeker spawned right on its spawner.
pub fn boss(tables: &ContentTables) -> PlayerBlueprint {
    PlayerBlueprint {
        health: tables.boss.health,
        orbs: tables.boss.orbs,
        behaviour: Behaviour::Seeker,
        stance: StanceKind::Orbital,
        abilities: tables.instantiate_loadout(&tables.boss.loadout),
        offset: Vec2::ZERO,
        is_boss: true,
    }
}

fn spawn_offset<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let mut axis = || {
        let magnitude = rng.gen_range(0.0..SPAWN_OFFSET_RANGE);
        if rng.gen_bool(0.5) {
            magnitude
        } else {
            -magnitude
        }
    };
    let x = axis();
    let y = axis();
    Vec2::new(x, y)
}
