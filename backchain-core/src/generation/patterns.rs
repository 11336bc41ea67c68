//! Obstacle pattern primitives.
//!
//! Each primitive maps a difficulty in `[0, 1]` to concrete parameters by
//! interpolating between an easy and a hard configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_GAP_PER_PLATFORM, MAX_STEP_HEIGHT, MIN_BRIDGE_WIDTH};

/// Seconds assumed for a pattern type the estimator does not know
pub const UNKNOWN_PATTERN_TIME: f32 = 2.0;

/// Fraction of full speed kept while walking a narrow bridge
const BRIDGE_SPEED_FACTOR: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternKind {
    GapJump,
    Staircase,
    MovingCrossing,
    NarrowBridge,
    PillarHop,
    Maze,
    Spiral,
}

impl PatternKind {
    pub const ALL: [PatternKind; 7] = [
        PatternKind::GapJump,
        PatternKind::Staircase,
        PatternKind::MovingCrossing,
        PatternKind::NarrowBridge,
        PatternKind::PillarHop,
        PatternKind::Maze,
        PatternKind::Spiral,
    ];

    /// Parameters for this primitive at `difficulty`
    pub fn build(self, difficulty: f32) -> Pattern {
        let d = difficulty;
        let steps = |scale: f32| (d * scale).floor() as u32;
        match self {
            PatternKind::GapJump => Pattern::GapJump {
                gap_length: 6.0 + d * 6.0,
                platform_count: 1 + steps(2.0),
                platform_size: 3.5 - d * 0.8,
                platform_spacing: 3.0 + d,
            },
            PatternKind::Staircase => Pattern::Staircase {
                step_count: 3 + steps(4.0),
                step_height: 0.7 + d * 0.4,
                step_width: 3.5 - d * 0.5,
                alternating: d > 0.3,
            },
            PatternKind::MovingCrossing => Pattern::MovingCrossing {
                platform_count: 1 + steps(2.0),
                speed: 1.2 + d * 0.8,
                platform_size: 5.0 - d * 1.5,
                gap_length: 8.0 + d * 6.0,
            },
            PatternKind::NarrowBridge => Pattern::NarrowBridge {
                width: 3.0 - d * 1.8,
                length: 10.0 + d * 8.0,
            },
            PatternKind::PillarHop => Pattern::PillarHop {
                pillar_count: 4 + steps(3.0),
                pillar_radius: 1.5 - d * 0.4,
                height_variation: d * 2.0,
                spacing: 3.5 - d * 0.5,
            },
            PatternKind::Maze => Pattern::Maze {
                complexity: 2 + steps(3.0),
                dead_ends: 1 + steps(2.0),
                wall_height: 3.0 + d,
            },
            PatternKind::Spiral => Pattern::Spiral {
                rotations: 0.5 + d,
                height_gain: 3.0 + d * 3.0,
                platform_count: 4 + steps(3.0),
                radius: 4.0 - d * 0.5,
            },
        }
    }
}

/// One obstacle section of a generated room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Pattern {
    GapJump {
        gap_length: f32,
        platform_count: u32,
        platform_size: f32,
        platform_spacing: f32,
    },
    Staircase {
        step_count: u32,
        step_height: f32,
        step_width: f32,
        alternating: bool,
    },
    MovingCrossing {
        platform_count: u32,
        speed: f32,
        platform_size: f32,
        gap_length: f32,
    },
    NarrowBridge {
        width: f32,
        length: f32,
    },
    PillarHop {
        pillar_count: u32,
        pillar_radius: f32,
        height_variation: f32,
        spacing: f32,
    },
    Maze {
        complexity: u32,
        dead_ends: u32,
        wall_height: f32,
    },
    Spiral {
        rotations: f32,
        height_gain: f32,
        platform_count: u32,
        radius: f32,
    },
    /// A pattern type this build does not recognise, e.g. from a newer save
    #[serde(other)]
    Unknown,
}

impl Pattern {
    pub fn kind(&self) -> Option<PatternKind> {
        match self {
            Pattern::GapJump { .. } => Some(PatternKind::GapJump),
            Pattern::Staircase { .. } => Some(PatternKind::Staircase),
            Pattern::MovingCrossing { .. } => Some(PatternKind::MovingCrossing),
            Pattern::NarrowBridge { .. } => Some(PatternKind::NarrowBridge),
            Pattern::PillarHop { .. } => Some(PatternKind::PillarHop),
            Pattern::Maze { .. } => Some(PatternKind::Maze),
            Pattern::Spiral { .. } => Some(PatternKind::Spiral),
            Pattern::Unknown => None,
        }
    }

    /// Seconds a competent player spends on this pattern
    pub fn estimated_time(&self, move_speed: f32) -> f32 {
        match *self {
            Pattern::GapJump { platform_count, .. } => platform_count as f32 * 0.6,
            Pattern::Staircase { step_count, .. } => step_count as f32 * 0.5,
            // waiting for platforms to come around
            Pattern::MovingCrossing { platform_count, .. } => platform_count as f32 * 2.5,
            Pattern::NarrowBridge { length, .. } => length / (move_speed * BRIDGE_SPEED_FACTOR),
            Pattern::PillarHop { pillar_count, .. } => pillar_count as f32 * 0.7,
            Pattern::Maze { complexity, .. } => complexity as f32 * 3.0,
            Pattern::Spiral {
                platform_count,
                height_gain,
                ..
            } => platform_count as f32 * 0.6 + height_gain * 0.3,
            Pattern::Unknown => UNKNOWN_PATTERN_TIME,
        }
    }

    /// Whether the derived parameters stay inside the player's jump and step reach
    pub fn is_traversable(&self) -> bool {
        match *self {
            Pattern::GapJump {
                gap_length,
                platform_count,
                ..
            } => gap_length / (platform_count as f32 + 1.0) <= MAX_GAP_PER_PLATFORM,
            Pattern::Staircase { step_height, .. } => step_height <= MAX_STEP_HEIGHT,
            Pattern::NarrowBridge { width, .. } => width >= MIN_BRIDGE_WIDTH,
            _ => true,
        }
    }
}
