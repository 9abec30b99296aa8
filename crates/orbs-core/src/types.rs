//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

use crate::constants::{NEAR_BORDER_DIVISOR, PLAY_AREA_HEIGHT, PLAY_AREA_WIDTH, REFERENCE_FRAME_RATE};
use crate::enums::SpawnerSide;

/// 2D position / vector in play-area points. Origin at the centre, y up.
pub use glam::DVec2 as Vec2;

/// Helpers on top of glam's vector API.
pub trait VectorExt {
    /// Rotate a quarter turn: `(x, y) -> (-y, x)`.
    fn perpendicular_clockwise(self) -> Self;
    /// Rotate a quarter turn the other way: `(x, y) -> (y, -x)`.
    fn perpendicular_counter_clockwise(self) -> Self;
    /// Angle of the vector in radians, measured from +x.
    fn heading(self) -> f64;
    /// Unit vector for an angle measured from +x.
    fn from_heading(angle: f64) -> Self;
    /// Normalized vector, or zero when the length is zero or non-finite.
    fn normalized_or_zero(self) -> Self;
}

impl VectorExt for Vec2 {
    fn perpendicular_clockwise(self) -> Self {
        Vec2::new(-self.y, self.x)
    }

    fn perpendicular_counter_clockwise(self) -> Self {
        Vec2::new(self.y, -self.x)
    }

    fn heading(self) -> f64 {
        self.y.atan2(self.x)
    }

    fn from_heading(angle: f64) -> Self {
        Vec2::new(angle.cos(), angle.sin())
    }

    fn normalized_or_zero(self) -> Self {
        self.normalize_or_zero()
    }
}

/// Rectangular play area centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f64,
    pub height: f64,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: PLAY_AREA_WIDTH,
            height: PLAY_AREA_HEIGHT,
        }
    }
}

impl PlayArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a body of the given half-extent still overlaps the area.
    pub fn contains(&self, position: Vec2, extent: f64) -> bool {
        let half = self.half_extents();
        position.x.abs() - extent < half.x && position.y.abs() - extent < half.y
    }

    /// Clamp a body of the given half-extent so it lies fully inside the area.
    pub fn clamp_inside(&self, position: Vec2, extent: f64) -> Vec2 {
        let half = self.half_extents();
        let max_x = (half.x - extent).max(0.0);
        let max_y = (half.y - extent).max(0.0);
        Vec2::new(position.x.clamp(-max_x, max_x), position.y.clamp(-max_y, max_y))
    }

    /// Whether one axis of the body has left the inner band of the area.
    pub fn is_near_border(&self, position: Vec2, extent: f64) -> bool {
        position.x.abs() + extent > self.width / NEAR_BORDER_DIVISOR
            || position.y.abs() + extent > self.height / NEAR_BORDER_DIVISOR
    }

    /// Anchor point for a spawner on the given side, just outside the area.
    pub fn side_point(&self, side: SpawnerSide, fraction: f64) -> Vec2 {
        match side {
            SpawnerSide::Left => Vec2::new(-self.width * fraction, 0.0),
            SpawnerSide::Right => Vec2::new(self.width * fraction, 0.0),
            SpawnerSide::Top => Vec2::new(0.0, self.height * fraction),
            SpawnerSide::Bottom => Vec2::new(0.0, -self.height * fraction),
        }
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of active ticks run so far.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Scale factor turning a per-frame quantity into one for a `dt`-second tick.
pub fn frame_scale(dt: f64) -> f64 {
    dt * REFERENCE_FRAME_RATE
}
