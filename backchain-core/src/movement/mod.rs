//! Axis-separated collision resolution for the player body.
//!
//! The body is a box around the eye point: feet sit `height` below it, the
//! head `head_clearance` above, and it extends `radius` to each side. Motion
//! is resolved vertically first with a narrow swept box, then along X and Z
//! independently with the full-width box.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::engine::config::PhysicsConfig;
use crate::world::{Aabb, Collider, PlatformHandle};

/// Body measurements used by collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyShape {
    pub height: f32,
    pub radius: f32,
    pub head_clearance: f32,
    pub feet_width_ratio: f32,
    /// Tolerance for landing, ceiling and standing-on checks
    pub step_tolerance: f32,
}

impl From<&PhysicsConfig> for BodyShape {
    fn from(physics: &PhysicsConfig) -> Self {
        Self {
            height: physics.player_height,
            radius: physics.player_radius,
            head_clearance: physics.head_clearance,
            feet_width_ratio: physics.feet_width_ratio,
            step_tolerance: physics.step_height,
        }
    }
}

impl Default for BodyShape {
    fn default() -> Self {
        Self::from(&PhysicsConfig::default())
    }
}

impl BodyShape {
    pub fn feet(&self, eye: Vec3) -> f32 {
        eye.y - self.height
    }

    pub fn head(&self, eye: Vec3) -> f32 {
        eye.y + self.head_clearance
    }

    /// Body box at `eye`, horizontally scaled by `width_ratio`
    pub fn body_box(&self, eye: Vec3, width_ratio: f32) -> Aabb {
        let r = self.radius * width_ratio;
        Aabb::new(
            Vec3::new(eye.x - r, self.feet(eye), eye.z - r),
            Vec3::new(eye.x + r, self.head(eye), eye.z + r),
        )
    }

    fn is_standing_on(&self, eye: Vec3, collider: &Collider) -> bool {
        self.feet(eye) >= collider.top() - self.step_tolerance
    }
}

/// Kinematic state of the player body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovementState {
    /// Eye position
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub was_grounded: bool,
    /// Platform stood on; looked up by handle each tick, never owned
    pub platform: Option<PlatformHandle>,
}

impl MovementState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Grounded this tick but not last tick
    pub fn just_landed(&self) -> bool {
        self.grounded && !self.was_grounded
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Z,
}

/// Move `state` by `velocity * dt` against `colliders`.
///
/// Clears and recomputes the grounded flag and platform reference. An empty
/// collider slice means free motion.
pub fn move_with_collision(state: &mut MovementState, dt: f32, colliders: &[Collider], shape: &BodyShape) {
    let movement = state.velocity * dt;

    state.was_grounded = state.grounded;
    state.grounded = false;
    state.platform = None;

    resolve_vertical(state, movement.y, colliders, shape);
    resolve_horizontal(state, Axis::X, movement.x, colliders, shape);
    resolve_horizontal(state, Axis::Z, movement.z, colliders, shape);
}

fn resolve_vertical(state: &mut MovementState, dy: f32, colliders: &[Collider], shape: &BodyShape) {
    let previous_feet = shape.feet(state.position);
    let previous_head = shape.head(state.position);

    state.position.y += dy;

    let mut sweep = shape.body_box(state.position, shape.feet_width_ratio);
    sweep.min.y = previous_feet.min(shape.feet(state.position));
    sweep.max.y = previous_head.max(shape.head(state.position));

    for collider in colliders.iter().filter(|c| sweep.intersects(&c.bounds)) {
        // direction of travel decides floor vs ceiling, so one collider never does both
        if dy < 0.0 && previous_feet >= collider.top() - shape.step_tolerance {
            if collider.is_floor {
                state.position.y = collider.top() + shape.height;
                state.velocity.y = 0.0;
                state.grounded = true;
                state.platform = collider.platform;
                trace!(top = collider.top(), platform = ?collider.platform, "landed");
            }
        } else if dy > 0.0 && previous_head <= collider.bottom() + shape.step_tolerance {
            state.position.y = collider.bottom() - shape.head_clearance;
            state.velocity.y = 0.0;
            trace!(bottom = collider.bottom(), "hit ceiling");
        }
    }
}

fn resolve_horizontal(
    state: &mut MovementState,
    axis: Axis,
    amount: f32,
    colliders: &[Collider],
    shape: &BodyShape,
) {
    if amount == 0.0 {
        return;
    }
    let component = match axis {
        Axis::X => &mut state.position.x,
        Axis::Z => &mut state.position.z,
    };
    *component += amount;

    let body = shape.body_box(state.position, 1.0);
    let blocked = colliders.iter().any(|c| {
        body.intersects(&c.bounds) && (!c.is_floor || !shape.is_standing_on(state.position, c))
    });
    if blocked {
        match axis {
            Axis::X => state.position.x -= amount,
            Axis::Z => state.position.z -= amount,
        }
        trace!(?axis, amount, "horizontal move reverted");
    }
}
