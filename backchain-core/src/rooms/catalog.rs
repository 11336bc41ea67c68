//! The eight hand-built rooms, in registration order.
//!
//! Every recipe works in room-local coordinates: z runs from 0 at the
//! entrance to the room length at the exit, floor tops sit at y=0.

use bevy::math::Vec3;

use super::{RoomTemplate, Theme};
use crate::world::{Aabb, PlatformMotion, RoomBuilder};

pub fn builtin() -> Vec<RoomTemplate> {
    vec![
        RoomTemplate {
            id: "azure",
            name: "THE AZURE GATE",
            theme: Theme::new(0x0066cc, 0x00aaff, 0x001133, "◇"),
            build: build_azure_gate,
        },
        RoomTemplate {
            id: "crimson",
            name: "CRIMSON ASCENT",
            theme: Theme::new(0xcc2200, 0xff4422, 0x330500, "△"),
            build: build_crimson_ascent,
        },
        RoomTemplate {
            id: "emerald",
            name: "EMERALD ZIGZAG",
            theme: Theme::new(0x00aa44, 0x00ff66, 0x002211, "○"),
            build: build_emerald_zigzag,
        },
        RoomTemplate {
            id: "amber",
            name: "AMBER CROSSING",
            theme: Theme::new(0xcc8800, 0xffaa00, 0x221100, "□"),
            build: build_amber_crossing,
        },
        RoomTemplate {
            id: "violet",
            name: "VIOLET HELIX",
            theme: Theme::new(0x8800cc, 0xaa44ff, 0x110022, "✦"),
            build: build_violet_helix,
        },
        RoomTemplate {
            id: "silver",
            name: "SILVER EDGE",
            theme: Theme::new(0x667788, 0xaabbcc, 0x112233, "◈"),
            build: build_silver_edge,
        },
        RoomTemplate {
            id: "coral",
            name: "CORAL LABYRINTH",
            theme: Theme::new(0xff6677, 0xff99aa, 0x331122, "❖"),
            build: build_coral_labyrinth,
        },
        RoomTemplate {
            id: "cyan",
            name: "CYAN PILLARS",
            theme: Theme::new(0x00aaaa, 0x00ffff, 0x002222, "⬡"),
            build: build_cyan_pillars,
        },
    ]
}

fn build_azure_gate(b: &mut RoomBuilder) {
    let length = b.dims().length;
    b.floor(0.0, 10.0);
    b.floor(22.0, length);
    for (x, y, z) in [(-2.5, 0.25, 13.0), (2.0, 0.5, 16.0), (-1.0, 0.25, 19.0)] {
        b.platform(x, y, z, 2.5, 2.5);
    }
}

fn build_crimson_ascent(b: &mut RoomBuilder) {
    let length = b.dims().length;
    b.floor(0.0, 6.0);
    // up to the peak at z=16, then back down
    let steps = [
        (0.0, 1.0, 8.0),
        (0.0, 2.5, 10.0),
        (-2.0, 4.0, 12.0),
        (2.0, 5.5, 14.0),
        (0.0, 7.0, 16.0),
        (-3.0, 5.5, 18.0),
        (3.0, 4.0, 20.0),
        (0.0, 2.5, 22.0),
        (-2.0, 1.0, 24.0),
    ];
    for (x, y, z) in steps {
        b.platform(x, y, z, 2.5, 2.5);
    }
    b.floor(27.0, length);
}

fn build_emerald_zigzag(b: &mut RoomBuilder) {
    let length = b.dims().length;
    b.floor(0.0, 5.0);
    b.floor(27.0, length);
    let zigzag = [
        (0.0, 0.3, 6.0),
        (-2.5, 0.6, 9.5),
        (2.5, 0.9, 13.0),
        (-2.5, 0.9, 16.5),
        (2.5, 0.6, 20.0),
        (0.0, 0.3, 24.0),
    ];
    for (x, y, z) in zigzag {
        b.platform(x, y, z, 2.5, 2.0);
    }
}

fn build_amber_crossing(b: &mut RoomBuilder) {
    let length = b.dims().length;
    b.floor(0.0, 8.0);
    b.floor(24.0, length);

    let size = Vec3::new(4.0, 0.5, 4.0);
    b.moving_platform(
        Vec3::new(-3.0, 0.25, 12.0),
        size,
        PlatformMotion::horizontal(-4.0, 4.0, 1.8, 0.0),
    );
    // starts at the opposite phase
    b.moving_platform(
        Vec3::new(3.0, 0.25, 20.0),
        size,
        PlatformMotion::horizontal(4.0, -4.0, 1.5, std::f32::consts::PI),
    );
}

const HELIX_CENTER_Z: f32 = 16.0;
const HELIX_STEP_SIZE: Vec3 = Vec3::new(2.5, 0.2, 2.0);

fn build_violet_helix(b: &mut RoomBuilder) {
    let length = b.dims().length;
    b.floor(0.0, 4.0);
    b.floor(28.0, length);

    // central pillar, radius 2, 15 tall, half sunk below the floor
    b.block(
        Aabb::new(Vec3::new(-2.0, -7.5, 14.0), Vec3::new(2.0, 7.5, 18.0)),
        false,
    );

    b.platform(0.0, 0.5, 6.0, 2.5, 2.0);
    b.platform(-2.5, 1.2, 9.0, 2.5, 2.0);

    // three-quarter turn around the pillar, each step facing its axis
    let helix: [(f32, f32, f32); 6] = [
        (-1.5, 2.0, 12.5),
        (2.0, 2.8, 13.0),
        (3.5, 3.6, 16.0),
        (2.0, 4.4, 19.0),
        (-1.5, 5.2, 19.5),
        (-3.5, 6.0, 17.0),
    ];
    for (x, y, z) in helix {
        let yaw = (-x).atan2(HELIX_CENTER_Z - z);
        b.rotated_platform(Vec3::new(x, y, z), HELIX_STEP_SIZE, yaw);
    }

    b.platform(-1.0, 5.0, 21.5, 2.5, 2.0);
    b.platform(2.0, 3.5, 24.0, 2.5, 2.0);
    b.platform(0.0, 2.0, 26.5, 2.5, 2.0);
}

fn build_silver_edge(b: &mut RoomBuilder) {
    let length = b.dims().length;
    b.floor(0.0, 6.0);
    b.floor(26.0, length);
    // tightrope, 0.4 wide
    b.block(
        Aabb::from_center_size(Vec3::new(0.0, 0.15, 16.0), Vec3::new(0.4, 0.3, 20.0)),
        true,
    );
}

const MAZE_WALL_HEIGHT: f32 = 3.5;

fn build_coral_labyrinth(b: &mut RoomBuilder) {
    let length = b.dims().length;
    b.floor(0.0, length);

    let y = MAZE_WALL_HEIGHT / 2.0;
    // (x, z, width, depth)
    let walls = [
        (-6.5, 15.0, 0.5, 22.0),
        (6.5, 15.0, 0.5, 22.0),
        (-4.0, 5.0, 5.0, 0.5),
        (4.0, 5.0, 5.0, 0.5),
        (0.0, 8.0, 4.0, 0.5),
        (4.5, 10.0, 0.5, 6.0),
        (0.0, 12.0, 0.5, 6.0),
        (-3.0, 14.0, 4.0, 0.5),
        (-4.5, 18.0, 0.5, 6.0),
        (4.5, 20.0, 0.5, 6.0),
        (2.0, 22.0, 4.0, 0.5),
        (-4.0, 26.0, 5.0, 0.5),
        (5.0, 26.0, 3.0, 0.5),
    ];
    for (x, z, w, d) in walls {
        b.wall(x, y, z, w, MAZE_WALL_HEIGHT, d);
    }
}

fn build_cyan_pillars(b: &mut RoomBuilder) {
    let length = b.dims().length;
    b.floor(0.0, 6.0);
    b.floor(26.0, length);
    // (x, z, height); only the caps collide
    let pillars = [
        (0.0, 8.0, 1.5),
        (-4.0, 11.0, 2.5),
        (3.0, 14.0, 1.8),
        (-2.0, 17.0, 3.0),
        (4.0, 20.0, 2.2),
        (-1.0, 23.0, 1.0),
        (2.0, 25.0, 0.5),
    ];
    for (x, z, h) in pillars {
        b.platform(x, h, z, 2.5, 2.5);
    }
}
