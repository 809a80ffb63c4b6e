//! Difficulty-driven level generation: rooms laid out along x, walled, then furnished and dirtied.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Level;
use super::feature::{FURNITURE, MESSES};
use super::room::Room;
use super::seed::{LEVEL_STREAM, random_inclusive, stream_rng};
use crate::config::GenerationSettings;
use crate::types::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Inclusive room-count and room-size bounds for one difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TierProfile {
    pub min_rooms: usize,
    pub max_rooms: usize,
    pub min_size: usize,
    pub max_size: usize,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn code(self) -> u8 {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    pub fn profile(self) -> TierProfile {
        match self {
            Self::Easy => TierProfile { min_rooms: 2, max_rooms: 2, min_size: 6, max_size: 8 },
            Self::Medium => TierProfile { min_rooms: 3, max_rooms: 4, min_size: 8, max_size: 12 },
            Self::Hard => TierProfile { min_rooms: 5, max_rooms: 6, min_size: 12, max_size: 20 },
        }
    }
}

pub struct LevelGenerator {
    seed: u64,
    settings: GenerationSettings,
}

impl LevelGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed, settings: GenerationSettings::default() }
    }

    pub fn with_settings(seed: u64, settings: GenerationSettings) -> Self {
        Self { seed, settings }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn level_rng(&self, difficulty: Difficulty) -> ChaCha8Rng {
        stream_rng(self.seed, LEVEL_STREAM, u64::from(difficulty.code()))
    }

    /// Room count `generate` will produce for this seed and tier, without building rooms.
    pub fn room_count(&self, difficulty: Difficulty) -> usize {
        let profile = difficulty.profile();
        random_inclusive(&mut self.level_rng(difficulty), profile.min_rooms, profile.max_rooms)
    }

    pub fn generate(&self, difficulty: Difficulty) -> Level {
        let profile = difficulty.profile();
        let mut rng = self.level_rng(difficulty);
        let room_count = random_inclusive(&mut rng, profile.min_rooms, profile.max_rooms);

        let mut level = Level::new(room_count);
        let mut x_offset = 0.0_f32;
        for index in 0..room_count {
            let width = random_inclusive(&mut rng, profile.min_size, profile.max_size);
            let height = random_inclusive(&mut rng, profile.min_size, profile.max_size);
            let mut room = Room::new(
                index,
                width,
                height,
                Vec2::new(x_offset, 0.0),
                self.settings.tile_size,
            );
            room.generate_basic_room();

            let (low, high) = self.settings.furniture_count.bounds();
            let wanted = random_inclusive(&mut rng, low, high);
            let furnished = room.place_random_features(&mut rng, wanted, &FURNITURE);

            let (low, high) = self.settings.mess_count.bounds();
            let wanted_messes = random_inclusive(&mut rng, low, high);
            let dirtied = room.place_random_features(&mut rng, wanted_messes, &MESSES);
            debug!(room = index, width, height, furnished, dirtied, "room generated");

            if let Err(error) = level.add_room(index, room) {
                warn!(%error, "generated room was not added");
            }
            x_offset += width as f32 + self.settings.room_spacing;
        }

        info!(
            seed = self.seed,
            difficulty = difficulty.name(),
            rooms = room_count,
            messes = level.total_messes(),
            fingerprint = %format!("{:016x}", level.fingerprint()),
            "level generated"
        );
        level
    }
}
