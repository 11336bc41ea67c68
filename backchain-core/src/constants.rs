//! Centralized game constants for the backchain core.
//!
//! These are the literal defaults behind [`crate::engine::config::GameConfig`].
//! The traversal limits in the procedural section encode the player's jump and
//! step capability and are checked by the solvability gate.

// =====================================================
// Player physics
// =====================================================

/// Eye height above the feet
pub const PLAYER_HEIGHT: f32 = 1.7;

/// Horizontal half-extent of the player box
pub const PLAYER_RADIUS: f32 = 0.3;

/// Distance from eye to top of head
pub const HEAD_CLEARANCE: f32 = 0.2;

/// Horizontal move speed (units/s); overwrites velocity, no acceleration
pub const MOVE_SPEED: f32 = 8.0;

/// Vertical velocity applied on jump
pub const JUMP_FORCE: f32 = 10.0;

/// Downward acceleration (units/s²), uncapped terminal velocity
pub const GRAVITY: f32 = 25.0;

/// Width ratio of the thin box swept in the vertical pass
pub const FEET_WIDTH_RATIO: f32 = 0.4;

/// Tolerance used for landing, ceiling and standing-on checks
pub const STEP_HEIGHT: f32 = 0.1;

/// Eye height below which the attempt is lost
pub const FALL_DEATH_Y: f32 = -10.0;

/// Pitch clamp in radians (roughly ±85°)
pub const MAX_PITCH: f32 = 1.5;

// =====================================================
// Look input
// =====================================================

pub const MOUSE_SENSITIVITY: f32 = 0.002;
pub const TOUCH_SENSITIVITY: f32 = 0.004;
pub const KEYBOARD_TURN_SPEED: f32 = 2.5;
pub const KEYBOARD_LOOK_SPEED: f32 = 1.5;
pub const GAMEPAD_LOOK_SPEED: f32 = 2.5;

// =====================================================
// Run timing
// =====================================================

/// Classic mode: seconds granted per room
pub const BASE_TIME_PER_ROOM: f32 = 12.0;

/// Classic mode: bonus seconds per run number
pub const TIME_BONUS_PER_RUN: f32 = 3.0;

/// Adaptive mode: seconds for a room with no recorded best
pub const ADAPTIVE_BASE_TIME: f32 = 15.0;

/// Adaptive mode: floor on the budget, per room
pub const ADAPTIVE_MIN_TIME: f32 = 6.0;

/// Skill buffer applied to best times and par estimates
pub const ADAPTIVE_BUFFER: f32 = 1.3;

/// Countdown values that fire a warning cue once when crossed
pub const WARNING_THRESHOLDS: [f32; 2] = [5.0, 3.0];

/// Initial "last seen remaining" value for warning edge detection
pub const WARNING_RESET: f32 = 10.0;

// =====================================================
// Room dimensions
// =====================================================

pub const ROOM_LENGTH: f32 = 30.0;
pub const ROOM_WIDTH: f32 = 15.0;
pub const ROOM_HEIGHT: f32 = 12.0;

// =====================================================
// Scheduling
// =====================================================

/// Largest host frame delta fed to the simulation
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Fixed-step mode: upper bound on catch-up steps per host frame
pub const MAX_CATCH_UP_STEPS: u32 = 5;

// =====================================================
// Procedural generation
// =====================================================

/// Largest gap per platform a jump can clear
pub const MAX_GAP_PER_PLATFORM: f32 = 4.5;

/// Tallest step a jump can climb
pub const MAX_STEP_HEIGHT: f32 = 1.8;

/// Narrowest bridge the player can walk
pub const MIN_BRIDGE_WIDTH: f32 = 1.0;

/// Longest acceptable par time for a single room
pub const MAX_PAR_TIME: f32 = 120.0;

/// Attempts to avoid repeating a pattern type before allowing it
pub const PATTERN_PICK_ATTEMPTS: u32 = 5;

// =====================================================
// Persistence
// =====================================================

/// Key under which the save blob is stored
pub const SAVE_KEY: &str = "backchain_save_v2";
