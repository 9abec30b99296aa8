//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Team affiliation of players and orbs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    #[default]
    None,
    /// The input-controlled side.
    Blue,
    /// Spawned enemies.
    Red,
}

impl Team {
    pub fn orb_texture_key(self) -> &'static str {
        match self {
            Team::Blue => "MainOrb",
            Team::Red => "EnemyOrb",
            Team::None => "",
        }
    }

    pub fn player_texture_key(self) -> &'static str {
        match self {
            Team::Blue => "MainPlayer",
            Team::Red => "EnemyPlayer",
            Team::None => "",
        }
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
            Team::None => Team::None,
        }
    }

    /// Red players may walk outside the play area; blue players are kept inside.
    pub fn may_leave_play_area(self) -> bool {
        self == Team::Red
    }

    /// Render scale applied to this team's orbs.
    pub fn orb_visual_scale(self) -> f64 {
        match self {
            Team::Red => ORB_RED_VISUAL_SCALE,
            _ => 1.0,
        }
    }

    /// Orb regeneration modifier every player of this team starts with.
    pub fn orb_regen_offset(self) -> f64 {
        match self {
            Team::Red => ENEMY_ORB_REGEN_MODIFIER,
            _ => 0.0,
        }
    }
}

/// Status effects carried by players and orbs.
///
/// Effects hold no duration; expiry is scheduled on the timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Effect {
    Stunning,
    Slowing,
    OrbStealing,
    Invulnerable,
}

impl Effect {
    pub const ALL: [Effect; 4] = [
        Effect::Stunning,
        Effect::Slowing,
        Effect::OrbStealing,
        Effect::Invulnerable,
    ];

    /// Tint key for orbs carrying this effect.
    pub fn color_key(self) -> &'static str {
        match self {
            Effect::Stunning => "yellow",
            Effect::Slowing => "purple",
            Effect::OrbStealing => "cyan",
            Effect::Invulnerable => "lightBlue",
        }
    }
}

/// Orb formation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StanceKind {
    #[default]
    Orbital,
    Shield,
}

impl StanceKind {
    /// Mobility modifier applied while this stance is active.
    pub fn passive_mobility(self) -> f64 {
        match self {
            StanceKind::Orbital => 0.0,
            StanceKind::Shield => SHIELD_MOBILITY_PENALTY,
        }
    }

    pub fn icon_key(self) -> &'static str {
        match self {
            StanceKind::Orbital => "OrbitalStanceIcon",
            StanceKind::Shield => "ShieldStanceIcon",
        }
    }
}

/// Capability flags an ability kind can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Triggered by the player.
    Active,
    /// Applied once when the owner spawns.
    Passive,
    /// Flips between on and off when triggered.
    Toggleable,
    /// Has a second trigger.
    DoubleActive,
    /// Spends held orbs as its resource.
    OrbManaging,
}

/// Ability power tier. Ultimates are limited to one per loadout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityTier {
    #[default]
    Normal,
    Ultimate,
}

/// On/off state of toggleable abilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Toggle {
    #[default]
    Off,
    On,
}

/// Ability variants with their per-variant parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AbilityKind {
    /// Fire the top orb toward the aim point.
    Shoot,
    /// Toggle between the default stance and `stance`.
    ChangeStance { stance: StanceKind },
    /// Merge `orb_cost` top orbs into one.
    CombineOrbs {
        orb_cost: usize,
        #[serde(default)]
        normal_orb_cost: usize,
    },
    /// Jump along the moving direction.
    Teleport,
    /// Launch every held orb at the closest enemy, homing.
    UltimateShoot,
}

impl AbilityKind {
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            AbilityKind::Shoot => &[Capability::Active, Capability::Passive],
            AbilityKind::ChangeStance { .. } => &[Capability::Toggleable],
            AbilityKind::CombineOrbs { .. } => &[Capability::Active, Capability::OrbManaging],
            AbilityKind::Teleport => &[Capability::Active],
            AbilityKind::UltimateShoot => &[Capability::Active],
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn tier(&self) -> AbilityTier {
        match self {
            AbilityKind::UltimateShoot => AbilityTier::Ultimate,
            _ => AbilityTier::Normal,
        }
    }

    pub fn default_cooldown(&self) -> f64 {
        match self {
            AbilityKind::Shoot => SHOOT_COOLDOWN_SECS,
            AbilityKind::ChangeStance { .. } => CHANGE_STANCE_COOLDOWN_SECS,
            AbilityKind::CombineOrbs { .. } => COMBINE_COOLDOWN_SECS,
            AbilityKind::Teleport => TELEPORT_COOLDOWN_SECS,
            AbilityKind::UltimateShoot => ULTIMATE_COOLDOWN_SECS,
        }
    }

    pub fn icon_key(&self) -> &'static str {
        match self {
            AbilityKind::Shoot => "ShootIcon",
            AbilityKind::ChangeStance { stance } => stance.icon_key(),
            AbilityKind::CombineOrbs { .. } => "combine",
            AbilityKind::Teleport => "TeleportIcon",
            AbilityKind::UltimateShoot => "UltimateShootIcon",
        }
    }
}

/// Why an activation did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    Stunned,
    OnCooldown,
    InsufficientOrbs,
    NoTarget,
    /// The ability lacks the capability the trigger asked for.
    Unsupported,
    /// No ability in that loadout slot, or the owner is gone.
    NoSuchAbility,
}

/// Power-up variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    Healing,
    OrbsGrant,
    DamageUpgrade,
    OrbRegenUpgrade,
    SpeedUpgrade,
    MaxOrbsUpgrade,
    DoubleDamage,
    DoubleOrbRegen,
    SpeedBoost,
}

impl PowerUpKind {
    /// Drops left behind by killed enemies.
    pub const BONUSES: [PowerUpKind; 5] = [
        PowerUpKind::Healing,
        PowerUpKind::OrbsGrant,
        PowerUpKind::DoubleDamage,
        PowerUpKind::DoubleOrbRegen,
        PowerUpKind::SpeedBoost,
    ];

    /// Rewards placed after a cleared wave.
    pub const UPGRADES: [PowerUpKind; 2] = [PowerUpKind::OrbRegenUpgrade, PowerUpKind::DamageUpgrade];

    pub fn message(self) -> &'static str {
        match self {
            PowerUpKind::Healing => "Health +20",
            PowerUpKind::OrbsGrant => "Orbs +5",
            PowerUpKind::DamageUpgrade => "Damage UP",
            PowerUpKind::OrbRegenUpgrade => "Orb Regen UP",
            PowerUpKind::SpeedUpgrade => "Speed UP",
            PowerUpKind::MaxOrbsUpgrade => "Max Orbs +2",
            PowerUpKind::DoubleDamage => "DOUBLE DAMAGE",
            PowerUpKind::DoubleOrbRegen => "DOUBLE ORB REGEN",
            PowerUpKind::SpeedBoost => "SPEED BOOST",
        }
    }

    pub fn texture_key(self) -> &'static str {
        match self {
            PowerUpKind::Healing => "HealingPowerUp",
            PowerUpKind::OrbsGrant => "OrbsPowerUp",
            PowerUpKind::DamageUpgrade => "DamageUpgradePowerUp",
            PowerUpKind::OrbRegenUpgrade => "OrbRegenUpgradePowerUp",
            PowerUpKind::SpeedUpgrade => "SpeedUpgradePowerUp",
            PowerUpKind::MaxOrbsUpgrade => "MaxOrbsUpgradePowerUp",
            PowerUpKind::DoubleDamage => "DoubleDamagePowerUp",
            PowerUpKind::DoubleOrbRegen => "DoubleOrbRegenPowerUp",
            PowerUpKind::SpeedBoost => "SpeedBoostPowerUp",
        }
    }

    /// Lifetime of a temporary power-up; `None` for instant ones.
    pub fn duration(self) -> Option<f64> {
        match self {
            PowerUpKind::DoubleDamage => Some(DOUBLE_DAMAGE_SECS),
            PowerUpKind::DoubleOrbRegen => Some(DOUBLE_ORB_REGEN_SECS),
            PowerUpKind::SpeedBoost => Some(SPEED_BOOST_SECS),
            _ => None,
        }
    }

    pub fn is_temporary(self) -> bool {
        self.duration().is_some()
    }
}

/// Wave difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl WaveDifficulty {
    /// Waves 1-2 are easy, 3-4 medium, everything after hard.
    pub fn from_wave(wave: u32) -> Self {
        if wave <= EASY_MAX_WAVE {
            WaveDifficulty::Easy
        } else if wave <= MEDIUM_MAX_WAVE {
            WaveDifficulty::Medium
        } else {
            WaveDifficulty::Hard
        }
    }
}

/// Side of the play area a spawner is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Enemy movement behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Behaviour {
    /// Input-controlled or idle.
    #[default]
    None,
    /// Walks straight at the nearest opponent.
    Seeker,
    /// Keeps `preferred_distance` from the nearest opponent while strafing.
    Ranged { preferred_distance: f64 },
}

/// Lateral strafe direction of ranged enemies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JukeDirection {
    #[default]
    None,
    Left,
    Right,
}

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Ready,
    Active,
    Paused,
    Victory,
    Defeat,
}

/// Why an orb left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbDestroyCause {
    /// Lost an orb-versus-orb or orb-versus-player exchange.
    Combat,
    /// Absorbed into a combined orb.
    Absorbed,
    /// Left the play area.
    OutOfBounds,
    /// Owner died and the killer had no room for it.
    OwnerDied,
    /// Donor whose receiver vanished and whose owner had no room.
    Orphaned,
}

/// Contact categories, with their bitmask values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactCategory {
    Player = 1,
    Orb = 2,
    Pickup = 4,
    SafeArea = 8,
    Background = 16,
}

impl ContactCategory {
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// Kind of contact reported to presentation collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    OrbOrb,
    OrbPlayer,
    PickupPlayer,
}
