//! Backchain Core Library
//!
//! Deterministic game logic for a first-person backchaining platformer:
//! - Player controller (axis-separated collision, platform carry, fall death)
//! - Room templates and the eight built-in rooms
//! - Room assembly and the level manager (colliders, triggers, moving platforms)
//! - Procedural room layouts with par times and a solvability gate
//! - Run orchestration for classic, adaptive and speedrun modes
//! - Versioned save records with forward migration
//! - Bevy plugin wrapping the simulation for a host app

pub mod constants;
pub mod cues;
pub mod engine;
pub mod error;
pub mod gameflow;
pub mod generation;
pub mod logging;
pub mod movement;
pub mod persistence;
pub mod player;
pub mod rooms;
pub mod world;

pub use cues::{Cue, CueSink};
pub use engine::{BackchainPlugin, GameConfig, Simulation};
pub use gameflow::{GameMode, RunEvent, RunOrchestrator, RunPhase};
