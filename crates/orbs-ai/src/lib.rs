//! Enemy AI for the orb arena.
//!
//! Implements the seeker and ranged behaviours as pure functions over plain
//! data plus an injected RNG. The simulation feeds a context per enemy each
//! tick and applies the returned movement and ability triggers.

pub mod behaviour;
pub mod profiles;

pub use orbs_core as core;
