//! Fixed-size tile grid for one room, with perimeter walls and feature placement.

use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use super::error::GridError;
use super::feature::FeatureId;
use super::seed::{pick, random_inclusive};
use super::tile::Tile;
use crate::types::{TilePos, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    index: usize,
    width: usize,
    height: usize,
    /// Offset of tile (0, 0) in tile units.
    origin: Vec2,
    tile_size: f32,
    /// Column-major: tile `(x, y)` lives at `x * height + y`, so iteration is x outer, y inner.
    tiles: Vec<Tile>,
}

impl Room {
    pub fn new(index: usize, width: usize, height: usize, origin: Vec2, tile_size: f32) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                tiles.push(Tile::floor(TilePos::new(x as i32, y as i32), index));
            }
        }
        Self { index, width, height, origin, tile_size, tiles }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
        for tile in &mut self.tiles {
            tile.room = index;
        }
    }

    fn slot(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then_some(x * self.height + y)
    }

    fn out_of_range(&self, x: i32, y: i32) -> GridError {
        GridError::OutOfRange { x, y, width: self.width, height: self.height }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.slot(x, y).is_some()
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.slot(x, y).map(|slot| &self.tiles[slot])
    }

    pub(crate) fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.slot(x, y).map(|slot| &mut self.tiles[slot])
    }

    pub fn set_feature(&mut self, x: i32, y: i32, feature: FeatureId) -> Result<(), GridError> {
        let error = self.out_of_range(x, y);
        let tile = self.tile_mut(x, y).ok_or(error)?;
        tile.feature = feature;
        Ok(())
    }

    pub fn set_wall(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        let error = self.out_of_range(x, y);
        let tile = self.tile_mut(x, y).ok_or(error)?;
        tile.is_wall = true;
        tile.is_floor = false;
        tile.feature = FeatureId::Wall;
        Ok(())
    }

    pub fn is_perimeter(&self, x: i32, y: i32) -> bool {
        self.contains(x, y)
            && (x == 0 || y == 0 || x as usize == self.width - 1 || y as usize == self.height - 1)
    }

    /// Walls the perimeter. Interior cells are left untouched.
    pub fn generate_basic_room(&mut self) {
        let perimeter: Vec<TilePos> = self
            .tiles
            .iter()
            .map(|tile| tile.pos)
            .filter(|pos| self.is_perimeter(pos.x, pos.y))
            .collect();
        for pos in perimeter {
            if let Err(error) = self.set_wall(pos.x, pos.y) {
                warn!(%error, "perimeter wall skipped");
            }
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Occupied tiles in scan order (x outer, y inner).
    pub fn tiles_with_features(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|tile| tile.has_feature())
    }

    pub fn empty_interior_tiles(&self) -> Vec<TilePos> {
        self.tiles
            .iter()
            .filter(|tile| tile.is_empty_floor() && !self.is_perimeter(tile.pos.x, tile.pos.y))
            .map(|tile| tile.pos)
            .collect()
    }

    /// Places up to `count` features drawn from `palette` on distinct empty
    /// interior tiles. Returns how many were placed, which is `min(count, empty)`.
    pub fn place_random_features(
        &mut self,
        rng: &mut ChaCha8Rng,
        count: usize,
        palette: &[FeatureId],
    ) -> usize {
        let mut pool = self.empty_interior_tiles();
        let mut placed = 0;
        while placed < count && !pool.is_empty() {
            let pos = pool.swap_remove(random_inclusive(rng, 0, pool.len() - 1));
            let Some(feature) = pick(rng, palette) else {
                break;
            };
            if let Some(tile) = self.tile_mut(pos.x, pos.y) {
                tile.feature = feature;
                placed += 1;
            }
        }
        if placed < count {
            debug!(room = self.index, requested = count, placed, "room ran out of empty tiles");
        }
        placed
    }

    pub fn tile_to_world(&self, pos: TilePos) -> Vec2 {
        (self.origin + Vec2::from(pos)) * self.tile_size
    }

    pub(crate) fn clear_feature(&mut self, x: i32, y: i32) -> Option<FeatureId> {
        let tile = self.tile_mut(x, y)?;
        let previous = tile.feature;
        tile.feature = FeatureId::None;
        (!previous.is_none()).then_some(previous)
    }

    pub(crate) fn write_canonical_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.extend((self.index as u32).to_le_bytes());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.origin.x.to_le_bytes());
        bytes.extend(self.origin.y.to_le_bytes());
        bytes.extend(self.tile_size.to_le_bytes());
        for tile in &self.tiles {
            bytes.push(u8::from(tile.is_wall) | (u8::from(tile.is_floor) << 1));
            bytes.push(tile.feature.code());
        }
    }
}
