//! Room geometry, colliders, triggers and moving platforms.
//!
//! A room is assembled once from its template into a [`RoomInstance`] and then
//! handed to the [`LevelManager`], which owns the aggregated collider, trigger
//! and platform lists for every room in the current run. Colliders refer to
//! the platform that drives them through a [`PlatformHandle`] index, never a
//! pointer, so platform lists can be rebuilt per run without lifetime ties.

pub mod aabb;
pub mod assembler;
pub mod level;

pub use aabb::Aabb;
pub use assembler::{create_room, RoomBuilder};
pub use level::{LevelManager, PlacedRoom};

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// Index of a moving platform in the owning list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformHandle(pub usize);

/// Index of a collider in the owning list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderHandle(pub usize);

/// Solid box the player collides with.
///
/// `is_floor` marks a drivable top surface. Floors block descent from above
/// and are ignored horizontally while the player stands on them; everything
/// else blocks horizontal motion unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub bounds: Aabb,
    pub is_floor: bool,
    pub platform: Option<PlatformHandle>,
}

impl Collider {
    pub fn floor(bounds: Aabb) -> Self {
        Self {
            bounds,
            is_floor: true,
            platform: None,
        }
    }

    pub fn obstruction(bounds: Aabb) -> Self {
        Self {
            bounds,
            is_floor: false,
            platform: None,
        }
    }

    pub fn top(&self) -> f32 {
        self.bounds.max.y
    }

    pub fn bottom(&self) -> f32 {
        self.bounds.min.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    RoomEnd,
}

/// Volume that fires when the player's probe point is inside it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub bounds: Aabb,
    pub kind: TriggerKind,
    pub room_index: usize,
}

/// Axis a moving platform oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionAxis {
    Horizontal,
    Vertical,
    /// Reserved. Moves as [`MotionAxis::Horizontal`].
    Path,
}

/// Sinusoidal motion between two coordinates on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformMotion {
    pub axis: MotionAxis,
    pub start: f32,
    pub end: f32,
    /// Angular phase in radians
    pub phase: f32,
    /// Angular speed in radians per second
    pub speed: f32,
}

impl PlatformMotion {
    pub fn horizontal(start: f32, end: f32, speed: f32, phase: f32) -> Self {
        Self {
            axis: MotionAxis::Horizontal,
            start,
            end,
            phase,
            speed,
        }
    }

    pub fn vertical(start: f32, end: f32, speed: f32, phase: f32) -> Self {
        Self {
            axis: MotionAxis::Vertical,
            start,
            end,
            phase,
            speed,
        }
    }

    /// Normalized oscillation in `[0, 1]` at the current phase
    pub fn oscillation(&self) -> f32 {
        (self.phase.sin() + 1.0) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub motion: PlatformMotion,
    pub size: Vec3,
    pub position: Vec3,
    pub previous: Vec3,
    /// Displacement during the most recent update, used for player carry
    pub delta: Vec3,
    pub collider: ColliderHandle,
}

impl MovingPlatform {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    /// Advance the platform by `dt` and recompute its delta
    pub fn advance(&mut self, dt: f32) {
        self.motion.phase += dt * self.motion.speed;
        let t = self.motion.oscillation();
        let value = self.motion.start + (self.motion.end - self.motion.start) * t;

        self.previous = self.position;
        match self.motion.axis {
            MotionAxis::Vertical => self.position.y = value,
            MotionAxis::Horizontal | MotionAxis::Path => self.position.x = value,
        }
        self.delta = self.position - self.previous;
    }
}

/// A template placed at a longitudinal offset, before it joins a level
#[derive(Debug, Clone)]
pub struct RoomInstance {
    pub template_id: String,
    pub index: usize,
    pub z_offset: f32,
    /// Last room of the run; drawn with a finish gate instead of a portal
    pub is_last: bool,
    pub colliders: Vec<Collider>,
    pub triggers: Vec<Trigger>,
    pub platforms: Vec<MovingPlatform>,
    pub start_position: Vec3,
    pub end_position: Vec3,
}
