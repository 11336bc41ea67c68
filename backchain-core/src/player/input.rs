//! Abstract input snapshot read by the player controller.
//!
//! Devices write into [`InputState`]; the controller only reads it. The mouse
//! delta accumulates between ticks and is cleared by the simulation after
//! each step.

use std::collections::{HashMap, HashSet};

use bevy::input::keyboard::KeyCode;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Stick magnitudes below this are ignored
pub const GAMEPAD_DEADZONE: f32 = 0.2;

/// Left-stick deflection past which a direction counts as pressed
const GAMEPAD_DIRECTION_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    TurnLeft,
    TurnRight,
    LookUp,
    LookDown,
}

/// On-screen joystick; `delta` components are in `[-1, 1]`, +y pulls back
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Joystick {
    pub active: bool,
    pub delta: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pressed: HashSet<Action>,
    /// Gamepad contributions, merged with keys in [`InputState::is_pressed`]
    gamepad_pressed: HashSet<Action>,
    pub mouse_delta: Vec2,
    pub pointer_captured: bool,
    pub touch_device: bool,
    pub gamepad_look: Option<Vec2>,
    pub joystick: Joystick,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, action: Action, down: bool) {
        if down {
            self.pressed.insert(action);
        } else {
            self.pressed.remove(&action);
        }
    }

    pub fn press(&mut self, action: Action) {
        self.set(action, true);
    }

    pub fn release(&mut self, action: Action) {
        self.set(action, false);
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.gamepad_pressed.clear();
        self.joystick = Joystick::default();
        self.gamepad_look = None;
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action) || self.gamepad_pressed.contains(&action)
    }

    pub fn add_mouse_delta(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    pub fn clear_mouse_delta(&mut self) {
        self.mouse_delta = Vec2::ZERO;
    }

    /// Whether mouse/touch deltas should turn the view
    pub fn pointer_look_enabled(&self) -> bool {
        self.pointer_captured || self.touch_device
    }

    /// Map a gamepad poll onto movement actions and the look vector
    pub fn apply_gamepad(&mut self, left_stick: Vec2, right_stick: Vec2, jump_button: bool) {
        let left = apply_deadzone(left_stick);
        let right = apply_deadzone(right_stick);

        self.gamepad_pressed.clear();
        let directions = [
            (Action::Forward, left.y < -GAMEPAD_DIRECTION_THRESHOLD),
            (Action::Backward, left.y > GAMEPAD_DIRECTION_THRESHOLD),
            (Action::Left, left.x < -GAMEPAD_DIRECTION_THRESHOLD),
            (Action::Right, left.x > GAMEPAD_DIRECTION_THRESHOLD),
            (Action::Jump, jump_button),
        ];
        for (action, down) in directions {
            if down {
                self.gamepad_pressed.insert(action);
            }
        }
        self.gamepad_look = Some(right);
    }

    pub fn disconnect_gamepad(&mut self) {
        self.gamepad_pressed.clear();
        self.gamepad_look = None;
    }
}

fn apply_deadzone(stick: Vec2) -> Vec2 {
    let axis = |v: f32| if v.abs() < GAMEPAD_DEADZONE { 0.0 } else { v };
    Vec2::new(axis(stick.x), axis(stick.y))
}

/// Remappable keyboard bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBindings {
    keys: HashMap<KeyCode, Action>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let keys = [
            (KeyCode::KeyW, Action::Forward),
            (KeyCode::KeyS, Action::Backward),
            (KeyCode::KeyA, Action::Left),
            (KeyCode::KeyD, Action::Right),
            (KeyCode::Space, Action::Jump),
            (KeyCode::KeyQ, Action::TurnLeft),
            (KeyCode::ArrowLeft, Action::TurnLeft),
            (KeyCode::KeyE, Action::TurnRight),
            (KeyCode::ArrowRight, Action::TurnRight),
            (KeyCode::ArrowUp, Action::LookUp),
            (KeyCode::ArrowDown, Action::LookDown),
        ];
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl InputBindings {
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Bind `key` to `action`, replacing any previous binding of that key
    pub fn bind(&mut self, key: KeyCode, action: Action) -> Option<Action> {
        self.keys.insert(key, action)
    }

    pub fn unbind(&mut self, key: KeyCode) -> Option<Action> {
        self.keys.remove(&key)
    }

    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.keys.get(&key).copied()
    }

    pub fn keys_for(&self, action: Action) -> Vec<KeyCode> {
        self.keys
            .iter()
            .filter(|(_, &a)| a == action)
            .map(|(&k, _)| k)
            .collect()
    }

    /// Rebuild keyboard actions in `input` from the set of held keys
    pub fn apply<'a>(&self, held: impl IntoIterator<Item = &'a KeyCode>, input: &mut InputState) {
        input.pressed.clear();
        for key in held {
            if let Some(action) = self.action_for(*key) {
                input.pressed.insert(action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        let mut input = InputState::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        input.release(Action::Jump);
        assert!(!input.is_pressed(Action::Jump));
    }

    #[test]
    fn test_mouse_delta_accumulates_until_cleared() {
        let mut input = InputState::new();
        input.add_mouse_delta(Vec2::new(3.0, 1.0));
        input.add_mouse_delta(Vec2::new(2.0, -1.0));
        assert_eq!(input.mouse_delta, Vec2::new(5.0, 0.0));
        input.clear_mouse_delta();
        assert_eq!(input.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn test_default_bindings() {
        let bindings = InputBindings::default();
        assert_eq!(bindings.action_for(KeyCode::KeyW), Some(Action::Forward));
        assert_eq!(bindings.action_for(KeyCode::ArrowLeft), Some(Action::TurnLeft));
        assert_eq!(bindings.action_for(KeyCode::KeyZ), None);
        let mut turn_left = bindings.keys_for(Action::TurnLeft);
        turn_left.sort_by_key(|k| format!("{k:?}"));
        assert_eq!(turn_left, vec![KeyCode::ArrowLeft, KeyCode::KeyQ]);
    }

    #[test]
    fn test_remap_and_apply() {
        let mut bindings = InputBindings::default();
        assert_eq!(bindings.bind(KeyCode::KeyW, Action::Jump), Some(Action::Forward));
        bindings.bind(KeyCode::KeyZ, Action::Forward);
        let mut input = InputState::new();
        bindings.apply(&[KeyCode::KeyW, KeyCode::KeyZ], &mut input);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.is_pressed(Action::Forward));
        bindings.apply(&[], &mut input);
        assert!(!input.is_pressed(Action::Jump));
    }

    #[test]
    fn test_gamepad_deadzone_and_directions() {
        let mut input = InputState::new();
        input.apply_gamepad(Vec2::new(0.15, -0.9), Vec2::new(0.1, 0.5), false);
        assert!(input.is_pressed(Action::Forward));
        assert!(!input.is_pressed(Action::Right));
        assert_eq!(input.gamepad_look, Some(Vec2::new(0.0, 0.5)));
        input.disconnect_gamepad();
        assert!(!input.is_pressed(Action::Forward));
        assert_eq!(input.gamepad_look, None);
    }
}
