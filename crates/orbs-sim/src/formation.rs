//! Orb formations for each stance.
//!
//! A formation turns a player's orb count and geometry into per-orb offsets
//! from the player's centre. Pure geometry: the stance system applies the
//! offsets to orb destinations.

use std::f64::consts::{PI, TAU};

use orbs_core::constants::*;
use orbs_core::enums::StanceKind;
use orbs_core::types::Vec2;

/// Geometry needed to place a player's orbs.
#[derive(Debug, Clone, Copy)]
pub struct FormationInput {
    pub orb_count: usize,
    pub player_radius: f64,
    pub orbs_per_layer: usize,
    pub reference_angle: f64,
    /// Heading of the player's aim, in radians.
    pub aim_heading: f64,
}

/// Offsets for each orb, bottom of the stack first, plus the player's next
/// reference angle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    pub offsets: Vec<Vec2>,
    pub reference_angle: f64,
}

pub trait Formation {
    fn arrange(&self, input: &FormationInput, frame_scale: f64) -> Placement;
}

/// Concentric rotating rings with a slow radial pulse.
pub struct Orbital;

/// A fan of orbs in front of the player, facing its aim.
pub struct Shield;

pub fn formation_for(stance: StanceKind) -> &'static dyn Formation {
    match stance {
        StanceKind::Orbital => &Orbital,
        StanceKind::Shield => &Shield,
    }
}

fn ring_spacing(remaining: usize, per_layer: usize) -> f64 {
    TAU / remaining.min(per_layer).max(1) as f64
}

impl Formation for Orbital {
    fn arrange(&self, input: &FormationInput, frame_scale: f64) -> Placement {
        let per_layer = input.orbs_per_layer.max(1);
        let r = input.player_radius;
        let layer_spacing = r.max(ORBITAL_MIN_LAYER_SPACING);
        let base_radius = (2.0 * r).max(ORBITAL_MIN_LAYER_RADIUS);
        let reference = input.reference_angle;
        let pulse = 1.0 + reference.sin() / ORBITAL_PULSE_DIVISOR;

        let mut spacing = ring_spacing(input.orb_count, per_layer);
        let mut offsets = Vec::with_capacity(input.orb_count);
        for i in 0..input.orb_count {
            if i % per_layer == 0 {
                spacing = ring_spacing(input.orb_count - i, per_layer);
            }
            let layer = i / per_layer;
            let mut angle = (reference + spacing * i as f64) % TAU;
            // Odd layers sit between the orbs of the layer below.
            if layer % 2 == 1 {
                angle += spacing / 2.0;
            }
            let radius = (base_radius + layer as f64 * layer_spacing) * pulse;
            offsets.push(Vec2::new(radius * angle.sin(), radius * angle.cos()));
        }

        Placement {
            offsets,
            reference_angle: reference + ORBITAL_ANGULAR_SPEED * frame_scale,
        }
    }
}

impl Formation for Shield {
    fn arrange(&self, input: &FormationInput, _frame_scale: f64) -> Placement {
        let per_layer = input.orbs_per_layer.max(1);
        let r = input.player_radius;
        let spacing = if r > SHIELD_NARROW_RADIUS_THRESHOLD {
            SHIELD_NARROW_SPACING
        } else {
            SHIELD_WIDE_SPACING
        };
        let base_radius = (2.0 * r).max(SHIELD_MIN_LAYER_RADIUS);
        let layer_spacing = (r / 2.0).max(SHIELD_MIN_LAYER_SPACING);
        let reference = input.aim_heading;

        let mut relative = 0.0;
        let mut offsets = Vec::with_capacity(input.orb_count);
        for i in 0..input.orb_count {
            let layer = i / per_layer;
            let radius = base_radius + layer as f64 * layer_spacing;
            if i > 1 && i % per_layer == 0 {
                relative = 0.0;
            }
            let angle = reference + relative;
            offsets.push(Vec2::new(radius * angle.cos(), radius * angle.sin()));
            // Alternate sides, widening every second orb.
            if i % 2 == 0 {
                relative += spacing;
            }
            relative = -relative;
        }

        Placement {
            offsets,
            reference_angle: reference,
        }
    }
}

/// Render rotation of an orb at `offset` from its player: radial.
pub fn radial_rotation(offset: Vec2) -> f64 {
    offset.y.atan2(offset.x) - PI / 2.0
}
