//! TOML configuration for generation, simulation and logging.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LoggingSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// `(low, high)` even when `min` and `max` were written the wrong way round.
    pub fn bounds(self) -> (usize, usize) {
        (self.min.min(self.max), self.min.max(self.max))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub tile_size: f32,
    /// Gap between consecutive rooms along x, in tile units.
    pub room_spacing: f32,
    pub furniture_count: CountRange,
    pub mess_count: CountRange,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            room_spacing: 20.0,
            furniture_count: CountRange::new(2, 5),
            mess_count: CountRange::new(3, 6),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub heal_tick_interval: f32,
    pub default_range: f32,
    pub default_projectile_lifetime: f32,
    pub projectile_radius: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            heal_tick_interval: 0.5,
            default_range: 100.0,
            default_projectile_lifetime: 5.0,
            projectile_radius: 0.25,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    pub generation: GenerationSettings,
    pub simulation: SimulationSettings,
    pub logging: LoggingSettings,
}

impl JanitorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }

    pub fn write_atomic(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source: io::Error| ConfigError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        let content = self.to_toml_string()?;

        fs::write(&tmp_path, content).map_err(io_error)?;
        fs::rename(&tmp_path, path).map_err(io_error)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;
        require(positive(generation.tile_size), "generation.tile_size must be positive")?;
        require(non_negative(generation.room_spacing), "generation.room_spacing must not be negative")?;
        for (name, range) in
            [("furniture_count", generation.furniture_count), ("mess_count", generation.mess_count)]
        {
            if range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "generation.{name}: min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }

        self.simulation.validate()
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require(positive(self.heal_tick_interval), "simulation.heal_tick_interval must be positive")?;
        require(positive(self.default_range), "simulation.default_range must be positive")?;
        require(
            positive(self.default_projectile_lifetime),
            "simulation.default_projectile_lifetime must be positive",
        )?;
        require(
            non_negative(self.projectile_radius),
            "simulation.projectile_radius must not be negative",
        )
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn require(condition: bool, message: &str) -> Result<(), ConfigError> {
    if condition { Ok(()) } else { Err(ConfigError::Invalid(message.to_string())) }
}
