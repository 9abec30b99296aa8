//! Behaviour-specific movement profiles.
//!
//! Consolidates per-behaviour parameters for the behaviour evaluator.

use orbs_core::enums::Behaviour;

/// Movement profile for a behaviour variant.
pub struct BehaviourProfile {
    /// Input velocity magnitude fed to player movement.
    pub speed: f64,
    /// Distance kept from the target; `None` walks straight at it.
    pub preferred_distance: Option<f64>,
    /// Whether the enemy strafes sideways at random.
    pub strafes: bool,
    /// Whether the enemy fires its own abilities while on screen.
    pub fires_abilities: bool,
}

/// Get the profile for a behaviour. `Behaviour::None` yields `None`.
pub fn get_profile(behaviour: Behaviour) -> Option<BehaviourProfile> {
    use orbs_core::constants::*;

    match behaviour {
        Behaviour::None => None,
        Behaviour::Seeker => Some(BehaviourProfile {
            speed: SEEKER_SPEED,
            preferred_distance: None,
            strafes: false,
            fires_abilities: false,
        }),
        Behaviour::Ranged { preferred_distance } => Some(BehaviourProfile {
            speed: RANGED_SPEED,
            preferred_distance: Some(preferred_distance),
            strafes: true,
            fires_abilities: true,
        }),
    }
}
