//! Headless driver for the orb arena simulation.
//!
//! Runs the engine on its own thread behind a command channel, or drives it
//! directly with a scripted autoplay session.

pub mod autoplay;
pub mod game_loop;
pub mod state;

pub use orbs_sim::core;
