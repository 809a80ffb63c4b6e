use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use janitor_core::level::{Level, generate_missions};
use janitor_core::{AbilityLibrary, Difficulty, JanitorConfig, LevelGenerator, logging};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config; defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a level and print its rooms
    Generate {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, value_enum, default_value_t = DifficultyArg::Easy)]
        difficulty: DifficultyArg,
        /// Print feature spawns as JSON instead of the room map
        #[arg(long)]
        json: bool,
    },
    /// Preview the three mission offers for a seed
    Missions {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// List ability definitions
    Abilities {
        /// JSON ability library; the built-in set is used when omitted
        #[arg(short, long)]
        library: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => JanitorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => JanitorConfig::default(),
    };
    logging::init_tracing(&config.logging);

    match args.command {
        Command::Generate { seed, difficulty, json } => {
            let generator = LevelGenerator::with_settings(seed, config.generation.clone());
            let level = generator.generate(difficulty.into());
            if json {
                let spawns = serde_json::to_string_pretty(&level.feature_spawns())
                    .context("Failed to serialize feature spawns")?;
                println!("{spawns}");
            } else {
                print_level(&level);
            }
        }
        Command::Missions { seed } => {
            for mission in generate_missions(seed) {
                println!(
                    "{:<6} rooms: {}  size: {}..={}",
                    mission.difficulty.name(),
                    mission.room_count,
                    mission.min_size,
                    mission.max_size
                );
            }
        }
        Command::Abilities { library } => {
            let library = match &library {
                Some(path) => AbilityLibrary::load(path)
                    .with_context(|| format!("Failed to load ability library: {}", path.display()))?,
                None => AbilityLibrary::builtin(),
            };
            info!(count = library.len(), "ability library loaded");
            for ability in library.iter() {
                println!(
                    "{:<12} {:<14} cost {:>5.1}  cooldown {:>4.1}s  {}",
                    ability.name,
                    ability.targeting.name(),
                    ability.resource_cost,
                    ability.cooldown_seconds,
                    ability.description
                );
            }
        }
    }

    Ok(())
}

fn print_level(level: &Level) {
    for room in level.rooms().flatten() {
        println!("Room {} ({}x{})", room.index(), room.width(), room.height());
        for y in (0..room.height() as i32).rev() {
            let row: String = (0..room.width() as i32)
                .map(|x| match room.tile(x, y) {
                    Some(tile) if tile.is_wall => '#',
                    Some(tile) => tile.feature.glyph(),
                    None => ' ',
                })
                .collect();
            println!("{row}");
        }
        println!();
    }
    println!("Fingerprint: {:016x}", level.fingerprint());
    println!("Messes: {}/{}", level.remaining_messes(), level.total_messes());
}
