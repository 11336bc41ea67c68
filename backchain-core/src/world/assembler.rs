//! Room assembly.
//!
//! Template recipes describe their geometry in room-local coordinates through
//! [`RoomBuilder`]; the builder shifts everything by the room's longitudinal
//! offset so the resulting [`RoomInstance`] is in world space.

use bevy::math::Vec3;
use tracing::debug;

use super::{
    Aabb, Collider, ColliderHandle, MotionAxis, MovingPlatform, PlatformHandle, PlatformMotion,
    RoomInstance, Trigger, TriggerKind,
};
use crate::engine::config::RoomDimensions;
use crate::rooms::RoomTemplate;

/// Thickness of floor segments and platforms
pub const SLAB_THICKNESS: f32 = 0.5;
const WALL_THICKNESS: f32 = 0.5;
const CEILING_THICKNESS: f32 = 0.3;
/// Floor segments leave half a unit of clearance to each side wall
const FLOOR_INSET: f32 = 1.0;

const EXIT_HALF_WIDTH: f32 = 5.0;
const EXIT_HEIGHT: f32 = 8.0;
const EXIT_DEPTH: f32 = 2.0;
const START_INSET: f32 = 3.0;
const END_INSET: f32 = 2.0;
const ANCHOR_HEIGHT: f32 = 0.5;

/// Collects geometry for one room in room-local coordinates
#[derive(Debug)]
pub struct RoomBuilder {
    dims: RoomDimensions,
    offset: Vec3,
    colliders: Vec<Collider>,
    platforms: Vec<MovingPlatform>,
}

impl RoomBuilder {
    pub fn new(dims: RoomDimensions, z_offset: f32) -> Self {
        Self {
            dims,
            offset: Vec3::new(0.0, 0.0, z_offset),
            colliders: Vec::new(),
            platforms: Vec::new(),
        }
    }

    pub fn dims(&self) -> RoomDimensions {
        self.dims
    }

    /// Walkable floor segment spanning `z_start..z_end` with its top at y=0
    pub fn floor(&mut self, z_start: f32, z_end: f32) {
        let length = z_end - z_start;
        let center = Vec3::new(0.0, -SLAB_THICKNESS / 2.0, z_start + length / 2.0);
        let size = Vec3::new(self.dims.width - FLOOR_INSET, SLAB_THICKNESS, length);
        self.push(Collider::floor(Aabb::from_center_size(center, size)));
    }

    /// Walkable slab centred on `(x, y, z)`
    pub fn platform(&mut self, x: f32, y: f32, z: f32, width: f32, depth: f32) {
        let size = Vec3::new(width, SLAB_THICKNESS, depth);
        self.push(Collider::floor(Aabb::from_center_size(Vec3::new(x, y, z), size)));
    }

    /// Obstruction centred on `(x, y, z)`
    pub fn wall(&mut self, x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32) {
        let size = Vec3::new(width, height, depth);
        self.push(Collider::obstruction(Aabb::from_center_size(Vec3::new(x, y, z), size)));
    }

    /// Arbitrary room-local box
    pub fn block(&mut self, bounds: Aabb, is_floor: bool) {
        self.push(Collider {
            bounds,
            is_floor,
            platform: None,
        });
    }

    /// Walkable slab rotated about Y, stored as its enclosing axis-aligned box
    pub fn rotated_platform(&mut self, center: Vec3, size: Vec3, yaw: f32) {
        let (sin, cos) = (yaw.sin().abs(), yaw.cos().abs());
        let half = Vec3::new(
            cos * size.x / 2.0 + sin * size.z / 2.0,
            size.y / 2.0,
            sin * size.x / 2.0 + cos * size.z / 2.0,
        );
        self.block(Aabb::new(center - half, center + half), true);
    }

    /// Slab that oscillates according to `motion`; returns its room-local handle
    pub fn moving_platform(&mut self, center: Vec3, size: Vec3, motion: PlatformMotion) -> PlatformHandle {
        if motion.axis == MotionAxis::Path {
            debug!("path platform motion is not supported, moving horizontally");
        }
        let handle = PlatformHandle(self.platforms.len());
        let position = center + self.offset;
        let collider = ColliderHandle(self.colliders.len());
        self.colliders.push(Collider {
            bounds: Aabb::from_center_size(position, size),
            is_floor: true,
            platform: Some(handle),
        });
        self.platforms.push(MovingPlatform {
            motion,
            size,
            position,
            previous: position,
            delta: Vec3::ZERO,
            collider,
        });
        handle
    }

    fn push(&mut self, collider: Collider) {
        self.colliders.push(Collider {
            bounds: collider.bounds.translated(self.offset),
            ..collider
        });
    }

    fn enclosure(&mut self, is_first: bool) {
        let RoomDimensions {
            length,
            width,
            height,
        } = self.dims;
        self.wall(-width / 2.0, height / 2.0, length / 2.0, WALL_THICKNESS, height, length);
        self.wall(width / 2.0, height / 2.0, length / 2.0, WALL_THICKNESS, height, length);
        self.wall(0.0, height, length / 2.0, width, CEILING_THICKNESS, length);
        if is_first {
            self.wall(0.0, height / 2.0, WALL_THICKNESS / 2.0, width, height, WALL_THICKNESS);
        }
    }
}

/// Build a room from `template` at `z_offset`.
///
/// The enclosure (side walls, ceiling, back wall when `is_first`) is always
/// emitted first, then the template recipe, then one exit trigger spanning the
/// terminal cross-section tagged with `index`.
pub fn create_room(
    template: &RoomTemplate,
    dims: RoomDimensions,
    z_offset: f32,
    index: usize,
    is_first: bool,
    is_last: bool,
) -> RoomInstance {
    let mut builder = RoomBuilder::new(dims, z_offset);
    builder.enclosure(is_first);
    (template.build)(&mut builder);

    let exit = Trigger {
        bounds: Aabb::new(
            Vec3::new(-EXIT_HALF_WIDTH, 0.0, dims.length - EXIT_DEPTH + z_offset),
            Vec3::new(EXIT_HALF_WIDTH, EXIT_HEIGHT, dims.length + z_offset),
        ),
        kind: TriggerKind::RoomEnd,
        room_index: index,
    };

    debug!(
        template = template.id,
        index,
        z_offset,
        colliders = builder.colliders.len(),
        platforms = builder.platforms.len(),
        "room assembled"
    );

    RoomInstance {
        template_id: template.id.to_string(),
        index,
        z_offset,
        is_last,
        colliders: builder.colliders,
        triggers: vec![exit],
        platforms: builder.platforms,
        start_position: Vec3::new(0.0, ANCHOR_HEIGHT, z_offset + START_INSET),
        end_position: Vec3::new(0.0, ANCHOR_HEIGHT, z_offset + dims.length - END_INSET),
    }
}
