//! Room grids, feature placement and the level that owns them.

pub mod error;
pub mod feature;
pub mod generator;
pub mod mission;
pub mod room;
pub mod tile;

mod seed;

use serde::Serialize;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

pub use error::GridError;
pub use feature::FeatureId;
pub use generator::{Difficulty, LevelGenerator, TierProfile};
pub use mission::{MissionInfo, generate_missions};
pub use room::Room;
pub use tile::Tile;

use crate::types::{TilePos, Vec2};

pub const MESS_EXPERIENCE_REWARD: u32 = 5;

/// What the visual spawner needs to materialize one occupied tile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureSpawn {
    pub room: usize,
    pub pos: TilePos,
    pub feature: FeatureId,
    pub name: &'static str,
    pub world_pos: Vec2,
    pub needs_collider: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CleanedMess {
    pub room: usize,
    pub pos: TilePos,
    pub feature: FeatureId,
    pub experience: u32,
}

/// Fixed number of room slots, filled in by the generator. Slots may be empty mid-generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    rooms: Vec<Option<Room>>,
    current_room_index: usize,
    messes_cleaned: usize,
}

impl Level {
    pub fn new(room_count: usize) -> Self {
        Self { rooms: vec![None; room_count], current_room_index: 0, messes_cleaned: 0 }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn add_room(&mut self, index: usize, mut room: Room) -> Result<(), GridError> {
        let room_count = self.rooms.len();
        let slot = self
            .rooms
            .get_mut(index)
            .ok_or(GridError::RoomIndexOutOfRange { index, room_count })?;
        room.set_index(index);
        *slot = Some(room);
        Ok(())
    }

    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index).and_then(Option::as_ref)
    }

    pub fn rooms(&self) -> impl Iterator<Item = Option<&Room>> {
        self.rooms.iter().map(Option::as_ref)
    }

    pub fn current_room_index(&self) -> usize {
        self.current_room_index
    }

    pub fn set_current_room_index(&mut self, index: usize) -> Result<(), GridError> {
        if index >= self.rooms.len() {
            return Err(GridError::RoomIndexOutOfRange { index, room_count: self.rooms.len() });
        }
        self.current_room_index = index;
        Ok(())
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.room(self.current_room_index)
    }

    /// Occupied tiles in room order, then each room's scan order.
    pub fn all_tiles_with_features(&self) -> Vec<&Tile> {
        self.rooms.iter().flatten().flat_map(Room::tiles_with_features).collect()
    }

    pub fn feature_spawns(&self) -> Vec<FeatureSpawn> {
        self.rooms
            .iter()
            .flatten()
            .flat_map(|room| {
                room.tiles_with_features().map(move |tile| FeatureSpawn {
                    room: room.index(),
                    pos: tile.pos,
                    feature: tile.feature,
                    name: tile.feature.name(),
                    world_pos: room.tile_to_world(tile.pos),
                    needs_collider: tile.feature.needs_collider(),
                })
            })
            .collect()
    }

    /// Clears a mess and reports the reward. Absent for non-mess, already clean or out-of-range tiles.
    pub fn clean(&mut self, room_index: usize, x: i32, y: i32) -> Option<CleanedMess> {
        let room = self.rooms.get_mut(room_index)?.as_mut()?;
        if !room.tile(x, y)?.feature.is_mess() {
            return None;
        }
        let feature = room.clear_feature(x, y)?;
        self.messes_cleaned += 1;
        debug!(room = room_index, x, y, mess = feature.name(), "mess cleaned");
        Some(CleanedMess {
            room: room_index,
            pos: TilePos::new(x, y),
            feature,
            experience: MESS_EXPERIENCE_REWARD,
        })
    }

    pub fn remaining_messes(&self) -> usize {
        self.rooms
            .iter()
            .flatten()
            .flat_map(Room::tiles_with_features)
            .filter(|tile| tile.feature.is_mess())
            .count()
    }

    pub fn messes_cleaned(&self) -> usize {
        self.messes_cleaned
    }

    pub fn total_messes(&self) -> usize {
        self.remaining_messes() + self.messes_cleaned
    }

    pub fn all_messes_cleaned(&self) -> bool {
        self.remaining_messes() == 0
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        bytes.extend((self.current_room_index as u32).to_le_bytes());
        for room in &self.rooms {
            match room {
                Some(room) => {
                    bytes.push(1);
                    room.write_canonical_bytes(&mut bytes);
                }
                None => bytes.push(0),
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_room_level() -> Level {
        let mut level = Level::new(2);
        let mut first = Room::new(0, 5, 5, Vec2::ZERO, 1.0);
        first.generate_basic_room();
        first.set_feature(2, 2, FeatureId::Trash).expect("inside room");
        first.set_feature(1, 3, FeatureId::Table).expect("inside room");
        let mut second = Room::new(0, 5, 5, Vec2::new(25.0, 0.0), 1.0);
        second.set_feature(3, 1, FeatureId::Skeleton).expect("inside room");
        level.add_room(0, first).expect("slot 0");
        level.add_room(1, second).expect("slot 1");
        level
    }

    #[test]
    fn add_room_rejects_out_of_range_slots() {
        let mut level = Level::new(1);
        let error = level.add_room(3, Room::new(0, 3, 3, Vec2::ZERO, 1.0));
        assert_eq!(error, Err(GridError::RoomIndexOutOfRange { index: 3, room_count: 1 }));
        assert!(level.room(0).is_none());
        assert!(level.current_room().is_none());
    }

    #[test]
    fn add_room_reassigns_tile_room_index() {
        let level = two_room_level();
        let second = level.room(1).expect("room 1");
        assert!(second.tiles().all(|tile| tile.room == 1));
    }

    #[test]
    fn tiles_with_features_skip_empty_slots_and_keep_room_order() {
        let mut level = Level::new(3);
        let mut room = Room::new(0, 3, 3, Vec2::ZERO, 1.0);
        room.set_feature(1, 1, FeatureId::Chair).expect("inside room");
        level.add_room(2, room).expect("slot 2");
        let tiles = level.all_tiles_with_features();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].room, 2);

        let level = two_room_level();
        let rooms: Vec<_> = level.all_tiles_with_features().iter().map(|tile| tile.room).collect();
        assert!(rooms.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(level.all_tiles_with_features(), level.all_tiles_with_features());
    }

    #[test]
    fn feature_spawns_carry_world_positions_and_colliders() {
        let level = two_room_level();
        let skeleton = level
            .feature_spawns()
            .into_iter()
            .find(|spawn| spawn.feature == FeatureId::Skeleton)
            .expect("skeleton spawn");
        assert_eq!(skeleton.room, 1);
        assert_eq!(skeleton.world_pos, Vec2::new(28.0, 1.0));
        assert!(!skeleton.needs_collider);
        assert_eq!(skeleton.name, "Skeleton");
    }

    #[test]
    fn cleaning_is_idempotent_and_only_applies_to_messes() {
        let mut level = two_room_level();
        assert_eq!(level.total_messes(), 2);
        assert!(level.clean(0, 1, 3).is_none(), "tables are not messes");
        assert!(level.clean(0, 0, 0).is_none(), "walls are not messes");
        assert!(level.clean(0, 9, 9).is_none());
        assert!(level.clean(7, 2, 2).is_none());

        let cleaned = level.clean(0, 2, 2).expect("trash is a mess");
        assert_eq!(cleaned.feature, FeatureId::Trash);
        assert_eq!(cleaned.experience, MESS_EXPERIENCE_REWARD);
        assert!(level.clean(0, 2, 2).is_none());
        assert_eq!(level.messes_cleaned(), 1);
        assert!(!level.all_messes_cleaned());

        level.clean(1, 3, 1).expect("skeleton is a mess");
        assert!(level.all_messes_cleaned());
        assert_eq!(level.total_messes(), 2);
    }

    #[test]
    fn fingerprint_tracks_tile_changes() {
        let mut level = two_room_level();
        let before = level.fingerprint();
        assert_eq!(before, two_room_level().fingerprint());
        level.clean(0, 2, 2);
        assert_ne!(before, level.fingerprint());
    }

    #[test]
    fn current_room_index_is_bounds_checked() {
        let mut level = two_room_level();
        assert!(level.set_current_room_index(2).is_err());
        level.set_current_room_index(1).expect("room 1 exists");
        assert_eq!(level.current_room().map(Room::index), Some(1));
    }
}
