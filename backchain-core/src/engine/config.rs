use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub look: LookConfig,
    pub timing: TimingConfig,
    pub room: RoomDimensions,
    pub scheduler: SchedulerConfig,
    /// Seed for the adaptive room picker
    pub adaptive_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            look: LookConfig::default(),
            timing: TimingConfig::default(),
            room: RoomDimensions::default(),
            scheduler: SchedulerConfig::default(),
            adaptive_seed: 42,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Load from `path`, falling back to defaults when missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default game config");
                Self::default()
            }
        }
    }

    pub fn to_ron(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.room.length <= 0.0 || self.room.width <= 0.0 || self.room.height <= 0.0 {
            return Err(ConfigError::Invalid("room dimensions must be positive".into()));
        }
        if self.physics.move_speed <= 0.0 {
            return Err(ConfigError::Invalid("move_speed must be positive".into()));
        }
        if self.scheduler.max_frame_delta <= 0.0 {
            return Err(ConfigError::Invalid("max_frame_delta must be positive".into()));
        }
        if let StepMode::Fixed { hz } = self.scheduler.step_mode {
            if hz == 0 {
                return Err(ConfigError::Invalid("fixed step rate must be non-zero".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub player_height: f32,
    pub player_radius: f32,
    pub head_clearance: f32,
    pub move_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub feet_width_ratio: f32,
    pub step_height: f32,
    pub fall_death_y: f32,
    pub max_pitch: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            player_height: PLAYER_HEIGHT,
            player_radius: PLAYER_RADIUS,
            head_clearance: HEAD_CLEARANCE,
            move_speed: MOVE_SPEED,
            jump_force: JUMP_FORCE,
            gravity: GRAVITY,
            feet_width_ratio: FEET_WIDTH_RATIO,
            step_height: STEP_HEIGHT,
            fall_death_y: FALL_DEATH_Y,
            max_pitch: MAX_PITCH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    pub mouse_sensitivity: f32,
    pub touch_sensitivity: f32,
    pub keyboard_turn_speed: f32,
    pub keyboard_look_speed: f32,
    pub gamepad_look_speed: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: MOUSE_SENSITIVITY,
            touch_sensitivity: TOUCH_SENSITIVITY,
            keyboard_turn_speed: KEYBOARD_TURN_SPEED,
            keyboard_look_speed: KEYBOARD_LOOK_SPEED,
            gamepad_look_speed: GAMEPAD_LOOK_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub base_time_per_room: f32,
    pub time_bonus_per_run: f32,
    pub adaptive_base_time: f32,
    pub adaptive_min_time: f32,
    pub adaptive_buffer: f32,
    pub warning_thresholds: Vec<f32>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_time_per_room: BASE_TIME_PER_ROOM,
            time_bonus_per_run: TIME_BONUS_PER_RUN,
            adaptive_base_time: ADAPTIVE_BASE_TIME,
            adaptive_min_time: ADAPTIVE_MIN_TIME,
            adaptive_buffer: ADAPTIVE_BUFFER,
            warning_thresholds: WARNING_THRESHOLDS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDimensions {
    pub length: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self {
            length: ROOM_LENGTH,
            width: ROOM_WIDTH,
            height: ROOM_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub step_mode: StepMode,
    pub max_frame_delta: f32,
    pub max_catch_up_steps: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            step_mode: StepMode::Variable,
            max_frame_delta: MAX_FRAME_DELTA,
            max_catch_up_steps: MAX_CATCH_UP_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepMode {
    /// One step per host frame, clamped to `max_frame_delta`
    Variable,
    /// Accumulate host time and step at a fixed rate
    Fixed { hz: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = GameConfig::default();
        assert_eq!(config.physics.player_height, PLAYER_HEIGHT);
        assert_eq!(config.timing.base_time_per_room, 12.0);
        assert_eq!(config.room.length, 30.0);
        assert_eq!(config.scheduler.step_mode, StepMode::Variable);
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = GameConfig {
            adaptive_seed: 7,
            ..GameConfig::default()
        };
        let text = config.to_ron();
        let restored = GameConfig::from_ron_str(&text).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config =
            GameConfig::from_ron_str("(timing: (base_time_per_room: 20.0), adaptive_seed: 9)")
                .unwrap();
        assert_eq!(config.timing.base_time_per_room, 20.0);
        assert_eq!(config.timing.time_bonus_per_run, TIME_BONUS_PER_RUN);
        assert_eq!(config.adaptive_seed, 9);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GameConfig::from_ron_str("(room: (length: 0.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = GameConfig::from_ron_str("(scheduler: (step_mode: Fixed(hz: 0)))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let err = GameConfig::from_ron_str("(physics: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = GameConfig::load_or_default("/definitely/not/here.ron");
        assert_eq!(config, GameConfig::default());
    }
}
