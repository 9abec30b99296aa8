//! Randomized content generation.
//!
//! Everything here is a pure function of static content tables and an
//! injected RNG: weighted choices, enemy blueprints, spawner placement,
//! and power-up drops and rewards. Nothing touches the ECS world.

pub mod blueprint;
pub mod placement;
pub mod weighted;

pub use blueprint::PlayerBlueprint;
pub use weighted::WeightedTable;

#[cfg(test)]
mod tests;
