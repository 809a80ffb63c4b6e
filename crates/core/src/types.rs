use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
    pub struct ProjectileId;
    pub struct HealTaskId;
}

/// Integer tile coordinate local to a room. Ordering is `x` first, then `y`,
/// which is the scan order used by every feature query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(self) -> Option<Self> {
        let length = self.length();
        if length <= f32::EPSILON || !length.is_finite() {
            return None;
        }
        Some(Self { x: self.x / length, y: self.y / length })
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl From<TilePos> for Vec2 {
    fn from(pos: TilePos) -> Self {
        Self { x: pos.x as f32, y: pos.y as f32 }
    }
}

/// Bit set of collision layers. An entity on layer `n` matches when bit `n` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    pub fn all() -> Self {
        Self::ALL
    }

    pub fn from_layers(layers: &[u8]) -> Self {
        let bits = layers.iter().filter(|&&layer| layer < 32).fold(0_u32, |bits, &layer| {
            bits | (1 << layer)
        });
        Self(bits)
    }

    pub fn contains(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_pos_orders_by_x_then_y() {
        let mut positions = vec![TilePos::new(1, 0), TilePos::new(0, 2), TilePos::new(0, 1)];
        positions.sort();
        assert_eq!(positions, vec![TilePos::new(0, 1), TilePos::new(0, 2), TilePos::new(1, 0)]);
    }

    #[test]
    fn normalized_rejects_zero_vector() {
        assert_eq!(Vec2::ZERO.normalized(), None);
        let unit = Vec2::new(3.0, 4.0).normalized().expect("non-zero vector");
        assert!((unit.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn layer_mask_ignores_out_of_range_layers() {
        let mask = LayerMask::from_layers(&[0, 3, 40]);
        assert!(mask.contains(0));
        assert!(mask.contains(3));
        assert!(!mask.contains(1));
        assert!(!mask.contains(40));
        assert!(!LayerMask::NONE.contains(0));
        assert!(LayerMask::ALL.contains(31));
    }
}
