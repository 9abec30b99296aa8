//! Core types and definitions for the orb-arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, state snapshots, events, constants,
//! and the static content tables (ability loadouts, spawner levels).
//! It has no dependency on a runtime loop or presentation layer.

pub mod commands;
pub mod components;
pub mod constants;
pub mod content;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
