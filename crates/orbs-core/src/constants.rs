//! Simulation constants and tuning parameters.
//!
//! Speeds marked "per frame" are tuned for the reference frame rate and get
//! scaled by the elapsed time of each tick.

use std::f64::consts::PI;

/// Frame rate the per-frame speeds are tuned for (Hz).
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

/// Seconds per frame at the reference rate. Default step for drivers.
pub const DT: f64 = 1.0 / REFERENCE_FRAME_RATE;

// --- Play area ---

/// Default play area width (points).
pub const PLAY_AREA_WIDTH: f64 = 1024.0;

/// Default play area height (points).
pub const PLAY_AREA_HEIGHT: f64 = 768.0;

/// Divisor of the play area size below which a position counts as near the border.
pub const NEAR_BORDER_DIVISOR: f64 = 2.1;

/// Spawner anchors sit at this fraction of the play area size from the centre.
pub const SPAWNER_SIDE_FRACTION: f64 = 0.6;

// --- Orbs ---

/// Minimum (and starting) orb radius.
pub const ORB_DEFAULT_RADIUS: f64 = 8.0;

/// Base orb speed (points per frame).
pub const ORB_DEFAULT_SPEED: f64 = 8.0;

/// Orb speed grows linearly with distance to destination over this many points.
pub const ORB_SPEED_DISTANCE_DIVISOR: f64 = 35.0;

/// Orb speed is capped at this multiple of its base speed.
pub const ORB_MAX_SPEED_FACTOR: f64 = 3.0;

/// Base damage per point of orb radius.
pub const ORB_DAMAGE_PER_RADIUS: f64 = 10.0 / 7.0;

/// Red orbs are drawn slightly larger.
pub const ORB_RED_VISUAL_SCALE: f64 = 1.15;

// --- Players ---

pub const PLAYER_MIN_RADIUS: f64 = 15.0;
pub const PLAYER_MAX_RADIUS: f64 = 150.0;
pub const PLAYER_DEFAULT_HEALTH: i32 = 100;
pub const PLAYER_DEFAULT_MAX_ORBS: usize = 24;
pub const PLAYER_ORBS_PER_LAYER: usize = 12;

/// Movement multiplier at full health.
pub const PLAYER_MIN_MOVEMENT_MULTIPLIER: f64 = 0.07;

/// Movement multiplier at zero health.
pub const PLAYER_MAX_MOVEMENT_MULTIPLIER: f64 = 0.12;

/// Seconds between regenerated orbs with no modifier.
pub const PLAYER_BASE_ORB_REGEN_SECS: f64 = 1.5;

/// Enemies regenerate orbs three times slower.
pub const ENEMY_ORB_REGEN_MODIFIER: f64 = -200.0;

/// Aim distance (in moving-direction lengths) used when no enemy is visible.
pub const AIM_FALLBACK_DISTANCE: f64 = 30.0;

/// Orbs the main player starts with.
pub const MAIN_PLAYER_INITIAL_ORBS: usize = 12;

/// Maximum input vector length from a full joystick deflection.
pub const JOYSTICK_REACH: f64 = 75.0;

// --- Abilities ---

pub const SHOOT_COOLDOWN_SECS: f64 = 0.5;
pub const ENEMY_SHOOT_COOLDOWN_SECS: f64 = 3.0;
pub const CHANGE_STANCE_COOLDOWN_SECS: f64 = 1.5;
pub const COMBINE_COOLDOWN_SECS: f64 = 1.0;
pub const ENEMY_COMBINE_COOLDOWN_SECS: f64 = 1.2;
pub const TELEPORT_COOLDOWN_SECS: f64 = 10.0;
pub const ULTIMATE_COOLDOWN_SECS: f64 = 10.0;

/// Teleport travel distance: thirty minimum player radii.
pub const TELEPORT_DISTANCE: f64 = PLAYER_MIN_RADIUS * 30.0;

/// Held orbs stay invulnerable this long after a teleport.
pub const TELEPORT_INVULNERABILITY_SECS: f64 = 0.5;

pub const COMBINE_DEFAULT_ORB_COST: usize = 2;

/// A donor merges once within this multiple of the receiver radius.
pub const COMBINE_MERGE_DISTANCE_FACTOR: f64 = 1.7;

/// Receivers at or above this radius hand over to the next-older orb.
pub const COMBINE_RECEIVER_RADIUS_CAP: f64 = ORB_DEFAULT_RADIUS * 5.0;

pub const COMBINE_DONOR_SPEED_FACTOR: f64 = 2.0;

// --- Stances ---

/// Orbital reference angle change per frame (radians).
pub const ORBITAL_ANGULAR_SPEED: f64 = -0.05;
pub const ORBITAL_MIN_LAYER_RADIUS: f64 = 50.0;
pub const ORBITAL_MIN_LAYER_SPACING: f64 = 25.0;
pub const ORBITAL_PULSE_DIVISOR: f64 = 20.0;

pub const SHIELD_MIN_LAYER_RADIUS: f64 = 60.0;
pub const SHIELD_MIN_LAYER_SPACING: f64 = 15.0;
pub const SHIELD_WIDE_SPACING: f64 = PI / 10.0;
pub const SHIELD_NARROW_SPACING: f64 = PI / 18.0;
/// Players larger than this use the narrow shield spacing.
pub const SHIELD_NARROW_RADIUS_THRESHOLD: f64 = 30.0;
pub const SHIELD_MOBILITY_PENALTY: f64 = -50.0;

/// Damage modifier at which orbs show the boosted marker.
pub const DAMAGE_BOOST_THRESHOLD: i32 = 100;

// --- Effects & combat ---

pub const SLOW_MOBILITY_PENALTY: f64 = -30.0;
pub const SLOW_DURATION_SECS: f64 = 3.0;
pub const STUN_DURATION_SECS: f64 = 3.0;
pub const ORB_STEAL_COUNT: usize = 2;

/// Overkill shrinks the orb by this fraction of the victim's previous health.
pub const OVERKILL_SHRINK_FACTOR: f64 = 0.7;

/// Default bound (percent) of the random damage roll.
pub const DAMAGE_SPREAD_PERCENT: i32 = 20;

// --- Power-ups ---

/// Side length of a power-up pickup.
pub const POWER_UP_SIZE: f64 = 38.0;
pub const HEALING_AMOUNT: i32 = 20;
pub const ORBS_GRANT_AMOUNT: usize = 5;
pub const DAMAGE_UPGRADE_AMOUNT: i32 = 5;
pub const ORB_REGEN_UPGRADE_AMOUNT: f64 = 10.0;
pub const SPEED_UPGRADE_AMOUNT: f64 = 5.0;
pub const MAX_ORBS_UPGRADE_AMOUNT: usize = 2;
pub const DOUBLE_DAMAGE_AMOUNT: i32 = 100;
pub const DOUBLE_DAMAGE_SECS: f64 = 2.0;
pub const DOUBLE_ORB_REGEN_AMOUNT: f64 = 50.0;
pub const DOUBLE_ORB_REGEN_SECS: f64 = 2.0;
pub const SPEED_BOOST_AMOUNT: f64 = 30.0;
pub const SPEED_BOOST_SECS: f64 = 3.0;

/// Probability that a killed enemy drops a bonus power-up.
pub const POWER_UP_DROP_CHANCE: f64 = 0.89;

/// Dropped power-ups land this many power-up sizes away from the corpse.
pub const POWER_UP_DROP_OFFSET_FACTOR: f64 = 1.3;

/// Wave rewards keep at least this distance from the main player.
pub const REWARD_MIN_DISTANCE: f64 = 50.0;
pub const REWARD_MIN_COUNT: usize = 1;
pub const REWARD_MAX_COUNT: usize = 3;

// --- AI ---

pub const SEEKER_SPEED: f64 = 20.0;
pub const RANGED_SPEED: f64 = 15.0;

/// Per-frame chance that a ranged enemy re-rolls its strafe direction.
pub const JUKE_CHANCE: f64 = 0.014;

/// Per-frame chance that a visible ranged enemy fires each active ability.
pub const AI_ABILITY_CHANCE: f64 = 0.07;

pub const RANGED_PREFERRED_DISTANCES: [f64; 2] = [200.0, 300.0];

/// Chance that a generated enemy starts in the shield stance.
pub const SHIELD_STANCE_CHANCE: f64 = 0.15;

/// Enemy spawn offsets are drawn from this range on each axis (either sign).
pub const SPAWN_OFFSET_RANGE: f64 = 100.0;

// --- Waves ---

pub const WAVE_TRANSITION_SECS: f64 = 3.0;
pub const EASY_MAX_WAVE: u32 = 2;
pub const MEDIUM_MAX_WAVE: u32 = 4;
pub const BOSS_HEALTH: i32 = 375;
pub const BOSS_ORBS: usize = 12;
