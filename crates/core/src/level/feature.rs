//! Feature ids occupying room tiles: structure, furniture and cleanable messes.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureId {
    #[default]
    None,
    Table,
    Wall,
    Decoration,
    Door,
    Chair,
    Chest,
    DirtPile,
    Trash,
    BloodStain,
    BrokenGlass,
    Skeleton,
}

/// Pool drawn from by furniture placement. Walls only come from the perimeter pass.
pub const FURNITURE: [FeatureId; 5] = [
    FeatureId::Table,
    FeatureId::Decoration,
    FeatureId::Door,
    FeatureId::Chair,
    FeatureId::Chest,
];

pub const MESSES: [FeatureId; 5] = [
    FeatureId::DirtPile,
    FeatureId::Trash,
    FeatureId::BloodStain,
    FeatureId::BrokenGlass,
    FeatureId::Skeleton,
];

impl FeatureId {
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Table => 1,
            Self::Wall => 2,
            Self::Decoration => 3,
            Self::Door => 4,
            Self::Chair => 5,
            Self::Chest => 6,
            Self::DirtPile => 7,
            Self::Trash => 8,
            Self::BloodStain => 9,
            Self::BrokenGlass => 10,
            Self::Skeleton => 11,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        let feature = match code {
            0 => Self::None,
            1 => Self::Table,
            2 => Self::Wall,
            3 => Self::Decoration,
            4 => Self::Door,
            5 => Self::Chair,
            6 => Self::Chest,
            7 => Self::DirtPile,
            8 => Self::Trash,
            9 => Self::BloodStain,
            10 => Self::BrokenGlass,
            11 => Self::Skeleton,
            _ => return None,
        };
        Some(feature)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Table => "Table",
            Self::Wall => "Wall",
            Self::Decoration => "Decoration",
            Self::Door => "Door",
            Self::Chair => "Chair",
            Self::Chest => "Chest",
            Self::DirtPile => "Dirt Pile",
            Self::Trash => "Trash",
            Self::BloodStain => "Blood Stain",
            Self::BrokenGlass => "Broken Glass",
            Self::Skeleton => "Skeleton",
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }

    pub fn is_mess(self) -> bool {
        MESSES.contains(&self)
    }

    /// Whether the spawned object blocks movement and needs a collider.
    pub fn needs_collider(self) -> bool {
        matches!(self, Self::Table | Self::Wall | Self::Chest)
    }

    /// Single character used by text dumps of a room.
    pub fn glyph(self) -> char {
        match self {
            Self::None => '.',
            Self::Table => 'T',
            Self::Wall => '#',
            Self::Decoration => 'd',
            Self::Door => '+',
            Self::Chair => 'h',
            Self::Chest => 'C',
            Self::DirtPile => ',',
            Self::Trash => '%',
            Self::BloodStain => '~',
            Self::BrokenGlass => '*',
            Self::Skeleton => 'S',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_reject_unknown_values() {
        for code in 0..=11 {
            let feature = FeatureId::from_code(code).expect("known code");
            assert_eq!(feature.code(), code);
        }
        assert_eq!(FeatureId::from_code(12), None);
    }

    #[test]
    fn furniture_and_mess_pools_are_disjoint_and_exclude_walls() {
        for furniture in FURNITURE {
            assert!(!MESSES.contains(&furniture));
            assert!(!furniture.is_mess());
        }
        assert!(!FURNITURE.contains(&FeatureId::Wall));
        assert!(!MESSES.contains(&FeatureId::Wall));
        assert!(MESSES.iter().all(|mess| (7..=11).contains(&mess.code())));
    }

    #[test]
    fn only_tables_walls_and_chests_need_colliders() {
        let blocking: Vec<_> = (0..=11)
            .filter_map(FeatureId::from_code)
            .filter(|feature| feature.needs_collider())
            .collect();
        assert_eq!(blocking, vec![FeatureId::Table, FeatureId::Wall, FeatureId::Chest]);
        assert_eq!(FeatureId::BloodStain.name(), "Blood Stain");
    }
}
