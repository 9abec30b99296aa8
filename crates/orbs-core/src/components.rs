//! ECS components for hecs entities.
//!
//! Components are plain data with a few derived read-only accessors.
//! Logic that touches more than one entity lives in the simulation systems.

use std::collections::BTreeSet;

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{Vec2, VectorExt};

/// Ordered set of status effects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectSet(BTreeSet<Effect>);

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, effect: Effect) -> bool {
        self.0.contains(&effect)
    }

    /// Returns `true` if the effect was not already present.
    pub fn insert(&mut self, effect: Effect) -> bool {
        self.0.insert(effect)
    }

    pub fn remove(&mut self, effect: Effect) -> bool {
        self.0.remove(&effect)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Union `other` into this set.
    pub fn absorb(&mut self, other: &EffectSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn iter(&self) -> impl Iterator<Item = Effect> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Effect> for EffectSet {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What is currently steering an orb.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrbState {
    /// In its owner's list; the stance sets its destination every tick.
    #[default]
    Held,
    /// Shot and travelling to a fixed destination.
    InFlight,
    /// Ultimate orb re-aimed through `target` every tick.
    Homing { target: Entity },
    /// Combine donor steering into `receiver`.
    Merging { receiver: Entity },
}

/// Projectile / shield unit.
///
/// `owner` is a non-owning handle: the player that spawned or last received
/// the orb. It survives shooting so hits can be credited, and is cleared
/// when that player dies.
#[derive(Debug, Clone)]
pub struct Orb {
    pub owner: Option<Entity>,
    pub team: Team,
    pub radius: f64,
    /// Base speed in points per frame.
    pub speed: f64,
    pub position: Vec2,
    /// `None` leaves the orb where it is.
    pub destination: Option<Vec2>,
    pub effects: EffectSet,
    /// Render rotation in radians.
    pub rotation: f64,
    pub state: OrbState,
    /// Drawn stretched along its flight path.
    pub stretched: bool,
    /// Drawn with the damage-boost marker.
    pub damage_boosted: bool,
    /// Whether the orb has overlapped the play area since it was created.
    pub was_inside: bool,
}

impl Orb {
    pub fn new(team: Team, owner: Option<Entity>, position: Vec2, effects: EffectSet) -> Self {
        Self {
            owner,
            team,
            radius: ORB_DEFAULT_RADIUS,
            speed: ORB_DEFAULT_SPEED,
            position,
            destination: None,
            effects,
            rotation: 0.0,
            state: OrbState::Held,
            stretched: false,
            damage_boosted: false,
            was_inside: false,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.effects.contains(Effect::Invulnerable)
    }

    /// Orbs with effects or extra size are kept on top of the stack.
    pub fn is_special(&self) -> bool {
        !self.effects.is_empty() || self.radius > ORB_DEFAULT_RADIUS
    }

    pub fn base_damage(&self) -> i32 {
        base_damage(self.radius)
    }
}

/// Damage before modifiers for an orb of the given radius.
pub fn base_damage(radius: f64) -> i32 {
    (radius * ORB_DAMAGE_PER_RADIUS).floor() as i32
}

/// Damage after a percentage modifier, rounded to the nearest point.
pub fn modified_damage(base: i32, modifier_percent: i32) -> i32 {
    let base_f = f64::from(base);
    base + (base_f * f64::from(modifier_percent) / 100.0).round() as i32
}

/// An arena combatant.
#[derive(Debug, Clone)]
pub struct Player {
    pub team: Team,
    pub position: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Held orbs, bottom of the stack first. Ground truth for the orb budget.
    pub orbs: Vec<Entity>,
    pub max_orbs: usize,
    pub orbs_per_layer: usize,
    /// Seconds accumulated toward the next regenerated orb.
    pub orb_regen_counter: f64,
    /// Percentage applied to the regeneration interval.
    pub orb_regen_modifier: f64,
    pub stance: StanceKind,
    pub effects: EffectSet,
    /// Percentage added to orb damage.
    pub damage_modifier: i32,
    /// Percentage added to movement speed.
    pub mobility_modifier: f64,
    pub aim: Vec2,
    /// Last movement direction, scaled to twice the radius.
    pub moving_direction: Vec2,
    /// Formation rotation angle for the orbital stance.
    pub reference_angle: f64,
    pub behaviour: Behaviour,
    pub juke: JukeDirection,
    pub getting_closer: bool,
    pub is_boss: bool,
}

impl Player {
    pub fn new(team: Team, position: Vec2, health: i32) -> Self {
        Self {
            team,
            position,
            health,
            max_health: PLAYER_DEFAULT_HEALTH.max(health),
            orbs: Vec::new(),
            max_orbs: PLAYER_DEFAULT_MAX_ORBS,
            orbs_per_layer: PLAYER_ORBS_PER_LAYER,
            orb_regen_counter: 0.0,
            orb_regen_modifier: team.orb_regen_offset(),
            stance: StanceKind::default(),
            effects: EffectSet::new(),
            damage_modifier: 0,
            mobility_modifier: 0.0,
            aim: position + Vec2::X,
            moving_direction: Vec2::X,
            reference_angle: 0.0,
            behaviour: Behaviour::None,
            juke: JukeDirection::None,
            getting_closer: false,
            is_boss: false,
        }
    }

    /// Body radius: half the health, kept within the size bounds.
    pub fn radius(&self) -> f64 {
        (f64::from(self.health) / 2.0)
            .floor()
            .clamp(PLAYER_MIN_RADIUS, PLAYER_MAX_RADIUS)
    }

    /// Fraction of an input velocity applied per frame. Healthier is slower.
    pub fn movement_multiplier(&self) -> f64 {
        let ratio = if self.max_health > 0 {
            f64::from(self.health) / f64::from(self.max_health)
        } else {
            0.0
        };
        PLAYER_MAX_MOVEMENT_MULTIPLIER
            - ratio * (PLAYER_MAX_MOVEMENT_MULTIPLIER - PLAYER_MIN_MOVEMENT_MULTIPLIER)
    }

    pub fn orb_regen_interval(&self) -> f64 {
        PLAYER_BASE_ORB_REGEN_SECS * (1.0 - self.orb_regen_modifier / 100.0)
    }

    pub fn is_stunned(&self) -> bool {
        self.effects.contains(Effect::Stunning)
    }

    pub fn is_full(&self) -> bool {
        self.orbs.len() >= self.max_orbs
    }

    /// Aim direction scaled to twice the radius.
    pub fn close_aim(&self) -> Vec2 {
        (self.aim - self.position).normalized_or_zero() * self.radius() * 2.0
    }

    pub fn clamp_health(&mut self) {
        self.health = self.health.clamp(0, self.max_health);
    }
}

/// A cooldown-gated action in a player's loadout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    pub cooldown_secs: f64,
    /// Zero means ready.
    #[serde(default)]
    pub cooldown_remaining: f64,
    #[serde(default)]
    pub toggle: Toggle,
}

impl Ability {
    pub fn new(kind: AbilityKind) -> Self {
        Self::with_cooldown(kind, kind.default_cooldown())
    }

    pub fn with_cooldown(kind: AbilityKind, cooldown_secs: f64) -> Self {
        Self {
            kind,
            cooldown_secs,
            cooldown_remaining: 0.0,
            toggle: Toggle::Off,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    pub fn enter_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_secs;
    }

    /// Force the ready state, dropping any remaining cooldown.
    pub fn reset(&mut self) {
        self.cooldown_remaining = 0.0;
    }

    pub fn tick_cooldown(&mut self, dt: f64) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        }
    }
}

/// Abilities owned by a player, in trigger-slot order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loadout {
    pub abilities: Vec<Ability>,
}

/// Marker for the input-controlled player.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainPlayer;

/// Timed generator of enemy players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub level: u8,
    pub is_boss: bool,
    pub team: Team,
    pub position: Vec2,
    pub charges: u32,
    pub interval_secs: f64,
    /// Seconds accumulated toward the next spawn.
    pub counter: f64,
}

/// A collectable power-up lying in the arena.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUpPickup {
    pub kind: PowerUpKind,
    pub position: Vec2,
}
