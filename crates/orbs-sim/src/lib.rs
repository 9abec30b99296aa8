//! Simulation engine for the orb arena.
//!
//! Owns the hecs ECS world, runs systems once per frame,
//! and produces GameStateSnapshots for the frontend.

pub mod abilities;
pub mod context;
pub mod engine;
pub mod formation;
pub mod power_ups;
pub mod systems;
pub mod timers;
pub mod waves;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use orbs_core as core;

#[cfg(test)]
mod tests;
