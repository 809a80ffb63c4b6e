use serde::Serialize;

use super::feature::FeatureId;
use crate::types::TilePos;

/// One grid cell. `room` is the index of the owning room inside its level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub pos: TilePos,
    pub is_wall: bool,
    pub is_floor: bool,
    pub feature: FeatureId,
    pub room: usize,
}

impl Tile {
    pub fn floor(pos: TilePos, room: usize) -> Self {
        Self { pos, is_wall: false, is_floor: true, feature: FeatureId::None, room }
    }

    pub fn has_feature(&self) -> bool {
        !self.feature.is_none()
    }

    pub fn is_empty_floor(&self) -> bool {
        self.is_floor && !self.is_wall && self.feature.is_none()
    }
}
