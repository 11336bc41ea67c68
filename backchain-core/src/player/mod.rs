//! First-person player controller.
//!
//! One [`PlayerController::update`] call is one physics tick. The order of
//! the steps is observable and must not change:
//!
//! 1. look input turns the view (pitch clamped)
//! 2. movement input overwrites horizontal velocity
//! 3. jump, when grounded
//! 4. platform carry, when grounded on a moving platform
//! 5. gravity
//! 6. collision: vertical sweep, then X, then Z
//! 7. landing cue on the grounded edge
//!
//! Fall detection is a separate query so the run orchestrator decides when
//! to act on it.

pub mod input;

use bevy::math::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cues::{Cue, CueSink};
use crate::engine::config::{LookConfig, PhysicsConfig};
use crate::movement::{move_with_collision, BodyShape, MovementState};
use crate::world::LevelManager;

pub use input::{Action, InputBindings, InputState, Joystick};

/// View orientation in radians. Yaw π faces +z, down the room sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    /// Horizontal unit vector the view faces
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal unit vector to the right of the view
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Camera rotation, yaw applied before pitch
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    pub body: MovementState,
    pub orientation: Orientation,
    shape: BodyShape,
    physics: PhysicsConfig,
    look: LookConfig,
}

impl PlayerController {
    pub fn new(physics: PhysicsConfig, look: LookConfig) -> Self {
        Self {
            body: MovementState::default(),
            orientation: Orientation::default(),
            shape: BodyShape::from(&physics),
            physics,
            look,
        }
    }

    /// Place the feet at `(x, y, z)` facing `yaw`, at rest
    pub fn init(&mut self, feet: Vec3, yaw: f32) {
        self.body = MovementState::at(feet + Vec3::Y * self.physics.player_height);
        self.orientation = Orientation { yaw, pitch: 0.0 };
    }

    pub fn update(&mut self, dt: f32, input: &InputState, level: &LevelManager, cues: &mut impl CueSink) {
        self.apply_look(dt, input);
        self.apply_movement_input(input);

        if input.is_pressed(Action::Jump) && self.body.grounded {
            self.body.velocity.y = self.physics.jump_force;
            self.body.grounded = false;
            self.body.platform = None;
            cues.cue(Cue::Jump);
        }

        // airborne players are never carried
        if self.body.grounded {
            if let Some(platform) = self.body.platform.and_then(|h| level.platform(h)) {
                self.body.position += platform.delta;
            }
        }

        self.body.velocity.y -= self.physics.gravity * dt;
        move_with_collision(&mut self.body, dt, level.colliders(), &self.shape);

        // ceiling stops never count as landings
        if self.body.just_landed() && self.body.velocity.y <= 0.0 {
            trace!(y = self.body.position.y, "landing");
            cues.cue(Cue::Land);
        }
    }

    fn apply_look(&mut self, dt: f32, input: &InputState) {
        let look = &self.look;
        let o = &mut self.orientation;
        if input.is_pressed(Action::TurnLeft) {
            o.yaw += look.keyboard_turn_speed * dt;
        }
        if input.is_pressed(Action::TurnRight) {
            o.yaw -= look.keyboard_turn_speed * dt;
        }
        if input.is_pressed(Action::LookUp) {
            o.pitch += look.keyboard_look_speed * dt;
        }
        if input.is_pressed(Action::LookDown) {
            o.pitch -= look.keyboard_look_speed * dt;
        }

        if input.pointer_look_enabled() {
            let sensitivity = if input.pointer_captured {
                look.mouse_sensitivity
            } else {
                look.touch_sensitivity
            };
            o.yaw -= input.mouse_delta.x * sensitivity;
            o.pitch -= input.mouse_delta.y * sensitivity;
        }

        if let Some(stick) = input.gamepad_look {
            o.yaw -= stick.x * look.gamepad_look_speed * dt;
            o.pitch -= stick.y * look.gamepad_look_speed * dt;
        }

        let limit = self.physics.max_pitch;
        o.pitch = o.pitch.clamp(-limit, limit);
    }

    fn apply_movement_input(&mut self, input: &InputState) {
        let forward = self.orientation.forward();
        let right = self.orientation.right();

        let mut direction = Vec3::ZERO;
        if input.is_pressed(Action::Forward) {
            direction += forward;
        }
        if input.is_pressed(Action::Backward) {
            direction -= forward;
        }
        if input.is_pressed(Action::Right) {
            direction += right;
        }
        if input.is_pressed(Action::Left) {
            direction -= right;
        }
        if input.joystick.active {
            let Vec2 { x, y } = input.joystick.delta;
            direction += forward * -y + right * x;
        }

        let velocity = direction.normalize_or_zero() * self.physics.move_speed;
        self.body.velocity.x = velocity.x;
        self.body.velocity.z = velocity.z;
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn feet(&self) -> Vec3 {
        self.body.position - Vec3::Y * self.physics.player_height
    }

    /// Point tested against triggers: the middle of the body
    pub fn trigger_probe(&self) -> Vec3 {
        self.body.position - Vec3::Y * (self.physics.player_height / 2.0)
    }

    pub fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    pub fn has_fallen(&self) -> bool {
        self.body.position.y < self.physics.fall_death_y
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::engine::config::RoomDimensions;
    use crate::cues::NullSink;
    use crate::rooms::TemplateRegistry;
    use crate::world::{create_room, Aabb, Collider, RoomInstance};

    fn controller() -> PlayerController {
        PlayerController::new(PhysicsConfig::default(), LookConfig::default())
    }

    fn flat_level() -> LevelManager {
        let mut level = LevelManager::new();
        level.add_room(RoomInstance {
            template_id: "flat".into(),
            index: 0,
            z_offset: 0.0,
            is_last: true,
            colliders: vec![Collider::floor(Aabb::new(
                Vec3::new(-50.0, -0.5, -50.0),
                Vec3::new(50.0, 0.0, 50.0),
            ))],
            triggers: vec![],
            platforms: vec![],
            start_position: Vec3::ZERO,
            end_position: Vec3::ZERO,
        });
        level
    }

    fn settle(player: &mut PlayerController, level: &LevelManager, cues: &mut Vec<Cue>) {
        let input = InputState::new();
        for _ in 0..30 {
            player.update(1.0 / 60.0, &input, level, cues);
        }
    }

    #[test]
    fn test_init_places_eye_above_feet() {
        let mut player = controller();
        player.init(Vec3::new(0.0, 0.5, 3.0), PI);
        assert!((player.position() - Vec3::new(0.0, 2.2, 3.0)).length() < 1e-6);
        assert!(!player.is_grounded());
        assert!((player.orientation.forward() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_lands_once_with_cue() {
        let level = flat_level();
        let mut player = controller();
        player.init(Vec3::new(0.0, 0.5, 0.0), PI);
        let mut cues: Vec<Cue> = Vec::new();
        settle(&mut player, &level, &mut cues);
        assert!(player.is_grounded());
        assert_eq!(cues.iter().filter(|c| **c == Cue::Land).count(), 1);
        assert!(player.feet().y.abs() < 1e-4);
    }

    #[test]
    fn test_jump_requires_ground() {
        let level = flat_level();
        let mut player = controller();
        player.init(Vec3::new(0.0, 0.5, 0.0), PI);
        let mut input = InputState::new();
        input.press(Action::Jump);
        let mut cues: Vec<Cue> = Vec::new();
        player.update(1.0 / 60.0, &input, &level, &mut cues);
        assert!(!cues.contains(&Cue::Jump));

        settle(&mut player, &level, &mut cues);
        cues.clear();
        player.update(1.0 / 60.0, &input, &level, &mut cues);
        assert_eq!(cues, vec![Cue::Jump]);
        assert!(player.body.velocity.y > 0.0);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_forward_moves_along_facing() {
        let level = flat_level();
        let mut player = controller();
        player.init(Vec3::ZERO, PI);
        let mut cues: Vec<Cue> = Vec::new();
        settle(&mut player, &level, &mut cues);

        let mut input = InputState::new();
        input.press(Action::Forward);
        input.press(Action::Right);
        let before = player.position();
        player.update(0.1, &input, &level, &mut cues);
        let moved = player.position() - before;
        // diagonal input is normalized to move speed
        assert!((Vec2::new(moved.x, moved.z).length() - 0.8).abs() < 1e-4);
        assert!(moved.z > 0.0);
    }

    #[test]
    fn test_joystick_pull_back_moves_backwards() {
        let level = flat_level();
        let mut player = controller();
        player.init(Vec3::ZERO, PI);
        let mut cues: Vec<Cue> = Vec::new();
        settle(&mut player, &level, &mut cues);

        let mut input = InputState::new();
        input.joystick = Joystick {
            active: true,
            delta: Vec2::new(0.0, 1.0),
        };
        let before = player.position();
        player.update(0.1, &input, &level, &mut cues);
        assert!(player.position().z < before.z);
    }

    #[test]
    fn test_pitch_clamped() {
        let level = LevelManager::new();
        let mut player = controller();
        player.init(Vec3::ZERO, PI);
        let mut input = InputState::new();
        input.pointer_captured = true;
        input.mouse_delta = Vec2::new(0.0, -10_000.0);
        player.update(0.016, &input, &level, &mut NullSink);
        assert_eq!(player.orientation.pitch, 1.5);
    }

    #[test]
    fn test_mouse_ignored_without_capture() {
        let level = LevelManager::new();
        let mut player = controller();
        player.init(Vec3::ZERO, PI);
        let mut input = InputState::new();
        input.mouse_delta = Vec2::new(500.0, 0.0);
        player.update(0.016, &input, &level, &mut NullSink);
        assert_eq!(player.orientation.yaw, PI);
    }

    #[test]
    fn test_fall_detection() {
        let level = LevelManager::new();
        let mut player = controller();
        player.init(Vec3::ZERO, PI);
        let input = InputState::new();
        let mut cues: Vec<Cue> = Vec::new();
        for _ in 0..120 {
            player.update(1.0 / 60.0, &input, &level, &mut cues);
        }
        assert!(player.has_fallen());
    }

    #[test]
    fn test_carried_by_moving_platform() {
        let registry = TemplateRegistry::with_builtin();
        let mut level = LevelManager::new();
        level.add_room(create_room(
            registry.get("amber").unwrap(),
            RoomDimensions::default(),
            0.0,
            0,
            true,
            true,
        ));
        let platform = level.platforms()[0].clone();
        let mut player = controller();
        player.init(Vec3::new(platform.position.x, 0.5, platform.position.z), PI);
        let input = InputState::new();
        let mut cues: Vec<Cue> = Vec::new();
        for _ in 0..20 {
            player.update(1.0 / 60.0, &input, &level, &mut cues);
        }
        assert!(player.is_grounded());
        assert!(player.body.platform.is_some());

        for _ in 0..10 {
            level.update_moving_platforms(1.0 / 60.0);
            let delta = level.platforms()[0].delta;
            let before = player.position();
            player.update(1.0 / 60.0, &input, &level, &mut cues);
            let moved = player.position() - before;
            assert!((moved.x - delta.x).abs() < 1e-5);
            assert!((moved.z - delta.z).abs() < 1e-5);
        }
    }
}
