//! Procedural room generation.
//!
//! A layout is a short list of obstacle patterns drawn from a seeded
//! generator. [`validate_room`] is the solvability gate: it checks every
//! pattern against the player's reach and bounds the estimated par time.
//! A failed validation is an ordinary result for the caller to act on.

pub mod corridor;
pub mod maze;
pub mod patterns;
pub mod rng;

pub use corridor::{generate_corridor, Corridor, CorridorKind};
pub use maze::{generate_3d_maze, Direction, Maze3D};
pub use patterns::{Pattern, PatternKind};
pub use rng::Lcg;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::{
    ADAPTIVE_BUFFER, MAX_PAR_TIME, MOVE_SPEED, PATTERN_PICK_ATTEMPTS, ROOM_LENGTH,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub patterns: Vec<Pattern>,
    pub difficulty: f32,
    pub seed: u64,
}

/// Number of patterns for a difficulty
pub fn pattern_count(difficulty: f32) -> usize {
    if difficulty < 0.3 {
        2
    } else if difficulty < 0.7 {
        3
    } else {
        4
    }
}

/// Generate a layout for `difficulty` (clamped to `[0, 1]`) from `seed`.
///
/// Pattern types avoid repeating within a layout; after
/// [`PATTERN_PICK_ATTEMPTS`] rejected draws a repeat is accepted.
pub fn generate_room_layout(difficulty: f32, seed: u64) -> RoomLayout {
    let difficulty = if difficulty.is_nan() {
        0.0
    } else {
        difficulty.clamp(0.0, 1.0)
    };
    let mut rng = Lcg::new(seed);
    let count = pattern_count(difficulty);

    let mut used: Vec<PatternKind> = Vec::with_capacity(count);
    let mut patterns = Vec::with_capacity(count);
    for _ in 0..count {
        let mut kind = PatternKind::ALL[rng.index(PatternKind::ALL.len())];
        let mut attempts = 1;
        while used.contains(&kind) && attempts < PATTERN_PICK_ATTEMPTS {
            kind = PatternKind::ALL[rng.index(PatternKind::ALL.len())];
            attempts += 1;
        }
        trace!(?kind, attempts, "picked pattern");
        used.push(kind);
        patterns.push(kind.build(difficulty));
    }

    debug!(difficulty, seed, patterns = patterns.len(), "generated room layout");
    RoomLayout {
        patterns,
        difficulty,
        seed,
    }
}

/// Inputs to the par-time estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParTimeModel {
    pub room_length: f32,
    pub move_speed: f32,
    pub skill_buffer: f32,
}

impl Default for ParTimeModel {
    fn default() -> Self {
        Self {
            room_length: ROOM_LENGTH,
            move_speed: MOVE_SPEED,
            skill_buffer: ADAPTIVE_BUFFER,
        }
    }
}

impl ParTimeModel {
    pub fn par_time(&self, layout: &RoomLayout) -> f32 {
        let traversal = self.room_length / self.move_speed;
        let patterns: f32 = layout
            .patterns
            .iter()
            .map(|p| p.estimated_time(self.move_speed))
            .sum();
        (traversal + patterns) * self.skill_buffer
    }
}

/// Par time with the default room length, move speed and skill buffer
pub fn calculate_par_time(layout: &RoomLayout) -> f32 {
    ParTimeModel::default().par_time(layout)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ValidationFailure {
    ImpossiblePattern { pattern: Pattern },
    TooLong { par_time: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub failure: Option<ValidationFailure>,
    /// Present when every pattern passed, including when the total is too long
    pub par_time: Option<f32>,
}

/// Check a layout against the traversal limits and the par-time ceiling
pub fn validate_room(layout: &RoomLayout) -> ValidationReport {
    if let Some(pattern) = layout.patterns.iter().find(|p| !p.is_traversable()) {
        debug!(?pattern, "layout rejected: impossible pattern");
        return ValidationReport {
            valid: false,
            failure: Some(ValidationFailure::ImpossiblePattern {
                pattern: pattern.clone(),
            }),
            par_time: None,
        };
    }

    let par_time = calculate_par_time(layout);
    if par_time > MAX_PAR_TIME {
        debug!(par_time, "layout rejected: too long");
        return ValidationReport {
            valid: false,
            failure: Some(ValidationFailure::TooLong { par_time }),
            par_time: Some(par_time),
        };
    }

    ValidationReport {
        valid: true,
        failure: None,
        par_time: Some(par_time),
    }
}
