//! Level manager: the aggregated geometry of every room in the current run.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Collider, ColliderHandle, MovingPlatform, PlatformHandle, RoomInstance, Trigger};

/// Metadata kept for each room after its geometry joined the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub template_id: String,
    pub index: usize,
    pub z_offset: f32,
    pub is_last: bool,
    pub start_position: Vec3,
    pub end_position: Vec3,
}

/// Owns colliders, triggers and moving platforms for all active rooms.
///
/// Handles stored in colliders and platforms are rebased into the aggregate
/// lists when a room is added, so they stay valid until [`LevelManager::clear`].
#[derive(Debug, Default)]
pub struct LevelManager {
    rooms: Vec<PlacedRoom>,
    colliders: Vec<Collider>,
    triggers: Vec<Trigger>,
    platforms: Vec<MovingPlatform>,
}

impl LevelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&mut self, room: RoomInstance) {
        let collider_base = self.colliders.len();
        let platform_base = self.platforms.len();

        self.colliders.extend(room.colliders.into_iter().map(|mut c| {
            if let Some(PlatformHandle(i)) = c.platform {
                c.platform = Some(PlatformHandle(i + platform_base));
            }
            c
        }));
        self.platforms
            .extend(room.platforms.into_iter().map(|mut p| {
                p.collider = ColliderHandle(p.collider.0 + collider_base);
                p
            }));
        self.triggers.extend(room.triggers);

        self.rooms.push(PlacedRoom {
            template_id: room.template_id,
            index: room.index,
            z_offset: room.z_offset,
            is_last: room.is_last,
            start_position: room.start_position,
            end_position: room.end_position,
        });
    }

    /// Advance every moving platform and refresh its collider box.
    ///
    /// Must run before player collision in the same tick, otherwise the
    /// player resolves against last tick's boxes.
    pub fn update_moving_platforms(&mut self, dt: f32) {
        for platform in &mut self.platforms {
            platform.advance(dt);
            if let Some(collider) = self.colliders.get_mut(platform.collider.0) {
                collider.bounds = platform.bounds();
            }
        }
    }

    /// All triggers containing `point`
    pub fn check_triggers(&self, point: Vec3) -> Vec<&Trigger> {
        self.triggers
            .iter()
            .filter(|t| t.bounds.contains_point(point))
            .collect()
    }

    /// Drop every room and reset the aggregate lists
    pub fn clear(&mut self) {
        debug!(rooms = self.rooms.len(), "clearing level");
        self.rooms.clear();
        self.colliders.clear();
        self.triggers.clear();
        self.platforms.clear();
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn platforms(&self) -> &[MovingPlatform] {
        &self.platforms
    }

    pub fn platform(&self, handle: PlatformHandle) -> Option<&MovingPlatform> {
        self.platforms.get(handle.0)
    }

    pub fn rooms(&self) -> &[PlacedRoom] {
        &self.rooms
    }

    pub fn room(&self, index: usize) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.index == index)
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::RoomDimensions;
    use crate::rooms::TemplateRegistry;
    use crate::world::{create_room, TriggerKind};

    fn level_with(ids: &[&str]) -> LevelManager {
        let registry = TemplateRegistry::with_builtin();
        let mut level = LevelManager::new();
        for (i, id) in ids.iter().enumerate() {
            let template = registry.get(id).unwrap();
            let room = create_room(
                template,
                RoomDimensions::default(),
                i as f32 * 30.0,
                i,
                i == 0,
                i + 1 == ids.len(),
            );
            level.add_room(room);
        }
        level
    }

    #[test]
    fn test_add_room_rebases_handles() {
        let level = level_with(&["amber", "amber"]);
        assert_eq!(level.platforms().len(), 4);
        for (i, platform) in level.platforms().iter().enumerate() {
            let collider = level.colliders()[platform.collider.0];
            assert_eq!(collider.platform, Some(PlatformHandle(i)));
        }
        assert!(level.platforms()[2].position.z > 30.0);
    }

    #[test]
    fn test_update_refreshes_collider_boxes() {
        let mut level = level_with(&["amber"]);
        level.update_moving_platforms(0.25);
        for platform in level.platforms() {
            assert_eq!(level.colliders()[platform.collider.0].bounds, platform.bounds());
            assert!(platform.delta.x != 0.0);
        }
    }

    #[test]
    fn test_check_triggers_matches_room_end() {
        let level = level_with(&["azure", "crimson"]);
        let hits = level.check_triggers(Vec3::new(0.0, 0.85, 59.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, TriggerKind::RoomEnd);
        assert_eq!(hits[0].room_index, 1);
        assert!(level.check_triggers(Vec3::new(0.0, 0.85, 15.0)).is_empty());
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut level = level_with(&["azure", "amber", "coral"]);
        assert_eq!(level.rooms().len(), 3);
        level.clear();
        assert!(level.is_empty());
        assert!(level.colliders().is_empty());
        assert!(level.triggers().is_empty());
        assert!(level.platforms().is_empty());
    }

    #[test]
    fn test_update_with_no_platforms_is_noop() {
        let mut level = LevelManager::new();
        level.update_moving_platforms(0.016);
        assert!(level.check_triggers(Vec3::ZERO).is_empty());
    }
}
