//! ECS systems that operate on the simulation world each frame.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! They keep no state of their own beyond what the engine hands them.

pub mod aim;
pub mod behaviour;
pub mod cleanup;
pub mod contact;
pub mod movement;
pub mod orb_regen;
pub mod orb_steering;
pub mod snapshot;
pub mod spawner;
pub mod stance;
