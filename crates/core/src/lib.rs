pub mod ability;
pub mod config;
pub mod level;
pub mod logging;
pub mod sim;
pub mod types;

pub use ability::{AbilityDefinition, AbilityLibrary, EffectDefinition, EffectKind, Loadout, TargetingMode};
pub use config::{ConfigError, JanitorConfig};
pub use level::{Difficulty, FeatureId, Level, LevelGenerator, Room, Tile};
pub use sim::{CastFailure, CastOutcome, CastPoint, CastReport, CasterState, Entity, World, WorldEvent};
pub use types::*;
