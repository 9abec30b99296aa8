//! Tests for weighted choice, blueprint generation, and placement.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use orbs_core::constants::*;
use orbs_core::content::ContentTables;
use orbs_core::enums::*;
use orbs_core::types::{PlayArea, Vec2};

use crate::blueprint;
use crate::placement::{self, SpawnerPlacement};
use crate::weighted::WeightedTable;

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[test]
fn test_weighted_table_rejects_empty_and_zero() {
    assert!(WeightedTable::<u8>::new(Vec::new()).is_none());
    assert!(WeightedTable::new(vec![('a', 0), ('b', 0)]).is_none());
}

#[test]
fn test_weighted_table_skips_zero_weights() {
    let table = WeightedTable::new(vec![("never", 0), ("always", 5)]).unwrap();
    let mut rng = rng(1);
    for _ in 0..200 {
        assert_eq!(*table.choose(&mut rng), "always");
    }
}

#[test]
fn test_weighted_table_follows_weights() {
    let table = WeightedTable::new(vec![(0usize, 25), (1usize, 75)]).unwrap();
    let mut rng = rng(2);
    let mut counts = [0u32; 2];
    for _ in 0..4000 {
        counts[*table.choose(&mut rng)] += 1;
    }
    let share = f64::from(counts[1]) / 4000.0;
    assert!((0.7..0.8).contains(&share), "expected ~75%, got {share}");
}

#[test]
fn test_level_one_blueprint_ranges() {
    let tables = ContentTables::builtin();
    let spec = tables.spawner_level(1).unwrap();
    let mut rng = rng(3);
    for _ in 0..100 {
        let bp = blueprint::generate(spec, &tables, &mut rng);
        assert_eq!(bp.health, 40);
        assert!((4..=5).contains(&bp.orbs), "orbs out of range: {}", bp.orbs);
        assert!(bp.offset.x.abs() < SPAWN_OFFSET_RANGE);
        assert!(bp.offset.y.abs() < SPAWN_OFFSET_RANGE);
        assert!(!bp.is_boss);
        assert_eq!(bp.abilities.len(), 1, "level 1 always rolls the shooting loadout");
        assert_eq!(bp.abilities[0].kind, AbilityKind::Shoot);
        assert_eq!(bp.abilities[0].cooldown_secs, ENEMY_SHOOT_COOLDOWN_SECS);
        match bp.behaviour {
            Behaviour::Seeker => {}
            Behaviour::Ranged { preferred_distance } => {
                assert!(RANGED_PREFERRED_DISTANCES.contains(&preferred_distance))
            }
            Behaviour::None => panic!("enemies always get a behaviour"),
        }
    }
}

#[test]
fn test_blueprint_variety() {
    let tables = ContentTables::builtin();
    let spec = tables.spawner_level(3).unwrap();
    let mut rng = rng(4);
    let blueprints: Vec<_> = (0..400)
        .map(|_| blueprint::generate(spec, &tables, &mut rng))
        .collect();
    assert!(blueprints.iter().any(|bp| bp.stance == StanceKind::Shield));
    assert!(blueprints.iter().any(|bp| bp.stance == StanceKind::Orbital));
    assert!(blueprints.iter().any(|bp| bp.behaviour == Behaviour::Seeker));
    assert!(blueprints
        .iter()
        .any(|bp| bp.abilities.iter().any(|a| matches!(a.kind, AbilityKind::CombineOrbs { .. }))));
    assert!(
        blueprints
            .iter()
            .all(|bp| bp.abilities.iter().all(|a| a.kind != AbilityKind::UltimateShoot)),
        "level 3 gives the ultimate loadout zero weight"
    );
}

#[test]
fn test_boss_level_yields_boss() {
    let tables = ContentTables::builtin();
    let spec = tables.spawner_level(4).unwrap();
    let bp = blueprint::generate(spec, &tables, &mut rng(5));
    assert!(bp.is_boss);
    assert_eq!(bp.health, BOSS_HEALTH);
    assert_eq!(bp.orbs, BOSS_ORBS);
    assert_eq!(bp.behaviour, Behaviour::Seeker);
    assert_eq!(bp.stance, StanceKind::Orbital);
    assert_eq!(bp.offset, Vec2::ZERO);
    assert_eq!(bp.abilities[0].cooldown_secs, ENEMY_SHOOT_COOLDOWN_SECS);
}

#[test]
fn test_spawner_layouts_per_tier() {
    let tables = ContentTables::builtin();
    let area = PlayArea::default();
    let mut rng = rng(6);
    for _ in 0..50 {
        let easy = placement::spawners_for_wave(WaveDifficulty::Easy, &tables.wave_levels, &area, &mut rng);
        assert_eq!(easy.len(), 1);
        assert_eq!(easy[0].level, 1);
        assert!(matches!(easy[0].side, SpawnerSide::Left | SpawnerSide::Right));

        let medium = placement::spawners_for_wave(WaveDifficulty::Medium, &tables.wave_levels, &area, &mut rng);
        assert_eq!(medium.len(), 2);
        assert!(medium.iter().all(|p| p.level == 2));
        let sum: Vec2 = medium.iter().map(|p: &SpawnerPlacement| p.position).sum();
        assert!(sum.length() < 1e-9, "medium spawners sit on opposite sides");

        let hard = placement::spawners_for_wave(WaveDifficulty::Hard, &tables.wave_levels, &area, &mut rng);
        assert_eq!(hard.len(), 1);
        assert_eq!(hard[0].level, 4);
    }
}

#[test]
fn test_spawner_positions_outside_play_area() {
    let area = PlayArea::default();
    let right = area.side_point(SpawnerSide::Right, SPAWNER_SIDE_FRACTION);
    assert!((right.x - PLAY_AREA_WIDTH * 0.6).abs() < 1e-9);
    assert!(!area.contains(right, 0.0));
}

#[test]
fn test_bonus_drop_offset_and_kind() {
    let mut rng = rng(7);
    let origin = Vec2::new(10.0, -20.0);
    let mut drops = 0;
    for _ in 0..500 {
        if let Some((kind, position)) = placement::bonus_drop(origin, &mut rng) {
            drops += 1;
            assert!(PowerUpKind::BONUSES.contains(&kind));
            let distance = position.distance(origin);
            assert!((distance - POWER_UP_SIZE * POWER_UP_DROP_OFFSET_FACTOR).abs() < 1e-9);
        }
    }
    assert!((400..=490).contains(&drops), "expected ~89% drop rate, got {drops}/500");
}

#[test]
fn test_wave_rewards_in_center_away_from_player() {
    let area = PlayArea::default();
    let mut rng = rng(8);
    for _ in 0..100 {
        let rewards = placement::wave_rewards(&area, Vec2::ZERO, &mut rng);
        assert!((REWARD_MIN_COUNT..=REWARD_MAX_COUNT).contains(&rewards.len()));
        for (kind, position) in rewards {
            assert!(PowerUpKind::UPGRADES.contains(&kind));
            assert!(position.x.abs() <= area.width / 4.0);
            assert!(position.y.abs() <= area.height / 4.0);
            assert!(position.length() >= REWARD_MIN_DISTANCE);
        }
    }
}
