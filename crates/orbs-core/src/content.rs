//! Static content tables: ability loadout templates and spawner levels.
//!
//! Tables are plain data. [`ContentTables::builtin`] provides the stock game
//! content; alternatives are loaded from JSON. Every table goes through
//! [`ContentTables::validate`] before a simulation starts, so lookups at
//! runtime never fail.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::Ability;
use crate::constants::*;
use crate::enums::{AbilityKind, AbilityTier, StanceKind};

/// Errors in static configuration. Raised at load time, never mid-frame.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed content JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("spawner level {0} is not defined")]
    MissingLevel(u8),
    #[error("spawner level {0} is defined more than once")]
    DuplicateLevel(u8),
    #[error("loadout `{0}` is not defined")]
    UnknownLoadout(String),
    #[error("loadout `{0}` has no abilities")]
    EmptyLoadout(String),
    #[error("loadout `{0}` has more than one ultimate ability")]
    MultipleUltimates(String),
    #[error("spawner level {0} has no loadout table")]
    EmptyLoadoutTable(u8),
    #[error("spawner level {0} has only zero loadout weights")]
    ZeroLoadoutWeights(u8),
    #[error("spawner level {level} has orb range {min}..={max}")]
    InvertedOrbRange { level: u8, min: usize, max: usize },
    #[error("spawner level {0} needs a positive interval and at least one charge")]
    InvalidTiming(u8),
    #[error("combine ability in loadout `{0}` needs an orb cost of at least 2")]
    InvalidOrbCost(String),
}

/// One ability slot of a loadout template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityTemplate {
    pub kind: AbilityKind,
    /// Overrides the kind's default cooldown.
    #[serde(default)]
    pub cooldown_secs: Option<f64>,
    /// Start the ability on cooldown instead of ready.
    #[serde(default)]
    pub starts_on_cooldown: bool,
}

impl AbilityTemplate {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            cooldown_secs: None,
            starts_on_cooldown: false,
        }
    }

    pub fn cooldown(mut self, secs: f64) -> Self {
        self.cooldown_secs = Some(secs);
        self
    }

    pub fn on_cooldown(mut self) -> Self {
        self.starts_on_cooldown = true;
        self
    }

    pub fn instantiate(&self) -> Ability {
        let mut ability = Ability::with_cooldown(
            self.kind,
            self.cooldown_secs.unwrap_or_else(|| self.kind.default_cooldown()),
        );
        if self.starts_on_cooldown {
            ability.enter_cooldown();
        }
        ability
    }
}

/// Per-level spawner parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerLevelSpec {
    pub level: u8,
    pub charges: u32,
    pub interval_secs: f64,
    pub orb_min: usize,
    pub orb_max: usize,
    pub health: i32,
    /// Loadout names with relative weights.
    pub loadout_weights: Vec<(String, u32)>,
    /// Spawn the boss blueprint instead of a generated one.
    #[serde(default)]
    pub is_boss: bool,
}

/// Fixed boss blueprint parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossSpec {
    pub health: i32,
    pub orbs: usize,
    pub loadout: String,
}

/// Spawner level used by each difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveLevels {
    pub easy: u8,
    pub medium: u8,
    pub hard: u8,
}

/// All static content the simulation looks up by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTables {
    pub loadouts: BTreeMap<String, Vec<AbilityTemplate>>,
    pub spawner_levels: Vec<SpawnerLevelSpec>,
    pub boss: BossSpec,
    pub wave_levels: WaveLevels,
    /// Loadout of the input-controlled player.
    pub main_player_loadout: String,
}

impl ContentTables {
    /// The stock game content.
    pub fn builtin() -> Self {
        let shoot = AbilityTemplate::new(AbilityKind::Shoot).cooldown(ENEMY_SHOOT_COOLDOWN_SECS);
        let combine = AbilityTemplate::new(AbilityKind::CombineOrbs {
            orb_cost: COMBINE_DEFAULT_ORB_COST,
            normal_orb_cost: 0,
        })
        .cooldown(ENEMY_COMBINE_COOLDOWN_SECS);

        let mut loadouts = BTreeMap::new();
        loadouts.insert(
            "main_player".to_string(),
            vec![
                AbilityTemplate::new(AbilityKind::Shoot),
                AbilityTemplate::new(AbilityKind::ChangeStance {
                    stance: StanceKind::Shield,
                }),
                AbilityTemplate::new(AbilityKind::Teleport),
                AbilityTemplate::new(AbilityKind::UltimateShoot),
            ],
        );
        loadouts.insert("shooting".to_string(), vec![shoot]);
        loadouts.insert(
            "shoot_and_teleport".to_string(),
            vec![shoot, AbilityTemplate::new(AbilityKind::Teleport)],
        );
        loadouts.insert("shoot_and_combine".to_string(), vec![shoot, combine]);
        loadouts.insert(
            "ultimate".to_string(),
            vec![AbilityTemplate::new(AbilityKind::UltimateShoot).on_cooldown()],
        );
        loadouts.insert("boss".to_string(), vec![shoot]);

        let weights = |w: [u32; 4]| -> Vec<(String, u32)> {
            ["shooting", "shoot_and_teleport", "shoot_and_combine", "ultimate"]
                .iter()
                .zip(w)
                .map(|(name, weight)| (name.to_string(), weight))
                .collect()
        };

        let level = |level: u8,
                     charges: u32,
                     interval_secs: f64,
                     orb_min: usize,
                     orb_max: usize,
                     health: i32,
                     w: [u32; 4],
                     is_boss: bool| SpawnerLevelSpec {
            level,
            charges,
            interval_secs,
            orb_min,
            orb_max,
            health,
            loadout_weights: weights(w),
            is_boss,
        };

        Self {
            loadouts,
            spawner_levels: vec![
                level(1, 3, 3.0, 4, 5, 40, [100, 0, 0, 0], false),
                level(2, 1, 3.0, 6, 8, 70, [100, 0, 0, 0], false),
                level(3, 2, 3.0, 10, 12, 90, [50, 25, 25, 0], false),
                level(4, 1, 2.0, 10, 15, 90, [25, 75, 0, 0], true),
                level(5, 1, 1.0, 10, 24, 90, [25, 75, 0, 0], false),
            ],
            boss: BossSpec {
                health: BOSS_HEALTH,
                orbs: BOSS_ORBS,
                loadout: "boss".to_string(),
            },
            wave_levels: WaveLevels {
                easy: 1,
                medium: 2,
                hard: 4,
            },
            main_player_loadout: "main_player".to_string(),
        }
    }

    /// Parse and validate tables from JSON.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let tables: ContentTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn spawner_level(&self, level: u8) -> Option<&SpawnerLevelSpec> {
        self.spawner_levels.iter().find(|spec| spec.level == level)
    }

    pub fn loadout(&self, name: &str) -> Option<&[AbilityTemplate]> {
        self.loadouts.get(name).map(Vec::as_slice)
    }

    /// Fresh abilities for a named loadout. Unknown names yield an empty loadout.
    pub fn instantiate_loadout(&self, name: &str) -> Vec<Ability> {
        self.loadout(name)
            .map(|templates| templates.iter().map(AbilityTemplate::instantiate).collect())
            .unwrap_or_default()
    }

    /// Check every cross reference and range in the tables.
    pub fn validate(&self) -> Result<(), ContentError> {
        for (name, templates) in &self.loadouts {
            if templates.is_empty() {
                return Err(ContentError::EmptyLoadout(name.clone()));
            }
            let ultimates = templates
                .iter()
                .filter(|t| t.kind.tier() == AbilityTier::Ultimate)
                .count();
            if ultimates > 1 {
                return Err(ContentError::MultipleUltimates(name.clone()));
            }
            let bad_cost = templates.iter().any(|t| {
                matches!(t.kind, AbilityKind::CombineOrbs { orb_cost, .. } if orb_cost < 2)
            });
            if bad_cost {
                return Err(ContentError::InvalidOrbCost(name.clone()));
            }
        }

        let mut seen = BTreeSet::new();
        for spec in &self.spawner_levels {
            if !seen.insert(spec.level) {
                return Err(ContentError::DuplicateLevel(spec.level));
            }
            if spec.loadout_weights.is_empty() {
                return Err(ContentError::EmptyLoadoutTable(spec.level));
            }
            if spec.loadout_weights.iter().all(|(_, w)| *w == 0) {
                return Err(ContentError::ZeroLoadoutWeights(spec.level));
            }
            if let Some((name, _)) = spec
                .loadout_weights
                .iter()
                .find(|(name, _)| !self.loadouts.contains_key(name))
            {
                return Err(ContentError::UnknownLoadout(name.clone()));
            }
            if spec.orb_min > spec.orb_max {
                return Err(ContentError::InvertedOrbRange {
                    level: spec.level,
                    min: spec.orb_min,
                    max: spec.orb_max,
                });
            }
            if !(spec.interval_secs > 0.0 && spec.interval_secs.is_finite()) || spec.charges == 0 {
                return Err(ContentError::InvalidTiming(spec.level));
            }
        }

        for level in [self.wave_levels.easy, self.wave_levels.medium, self.wave_levels.hard] {
            if self.spawner_level(level).is_none() {
                return Err(ContentError::MissingLevel(level));
            }
        }
        for name in [&self.boss.loadout, &self.main_player_loadout] {
            if !self.loadouts.contains_key(name) {
                return Err(ContentError::UnknownLoadout(name.clone()));
            }
        }
        Ok(())
    }
}

impl Default for ContentTables {
    fn default() -> Self {
        Self::builtin()
    }
}
