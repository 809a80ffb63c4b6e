//! Mission board previews: one offer per difficulty tier.

use serde::Serialize;

use super::generator::{Difficulty, LevelGenerator};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MissionInfo {
    pub difficulty: Difficulty,
    pub room_count: usize,
    pub min_size: usize,
    pub max_size: usize,
}

/// Easy, Medium and Hard offers. Room counts match what the generator builds for `seed`.
pub fn generate_missions(seed: u64) -> [MissionInfo; 3] {
    let generator = LevelGenerator::new(seed);
    Difficulty::ALL.map(|difficulty| {
        let profile = difficulty.profile();
        MissionInfo {
            difficulty,
            room_count: generator.room_count(difficulty),
            min_size: profile.min_size,
            max_size: profile.max_size,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offers_one_mission_per_tier_in_order() {
        let missions = generate_missions(5);
        let tiers: Vec<_> = missions.iter().map(|mission| mission.difficulty).collect();
        assert_eq!(tiers, Difficulty::ALL.to_vec());
        assert_eq!(missions[0].room_count, 2);
        assert!((3..=4).contains(&missions[1].room_count));
        assert!((5..=6).contains(&missions[2].room_count));
        assert_eq!((missions[2].min_size, missions[2].max_size), (12, 20));
    }
}
