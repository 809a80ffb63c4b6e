use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use janitor_core::ability::{ENEMY_LAYER, PassiveBonuses};
use janitor_core::sim::{Health, ResourcePool};
use janitor_core::{
    AbilityLibrary, CasterState, Entity, EntityId, JanitorConfig, Loadout, Vec2, World, WorldEvent, logging,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const LOADOUT: [&str; 4] = ["Broom Jab", "Soap Bolt", "Mop Sweep", "Second Wind"];
const SLIME_COUNT: usize = 6;
const DT: f32 = 0.05;
const BASE_SPEED: f32 = 4.0;
const ARENA_EXTENT: f32 = 8.0;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 2000)]
    ticks: u32,
    /// TOML config; its `[simulation]` section drives the arena
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Uniform in [0, 1).
fn unit(rng: &mut ChaCha8Rng) -> f32 {
    (rng.next_u64() >> 40) as f32 / (1u64 << 24) as f32
}

fn spread(rng: &mut ChaCha8Rng, extent: f32) -> Vec2 {
    Vec2::new((unit(rng) * 2.0 - 1.0) * extent, (unit(rng) * 2.0 - 1.0) * extent)
}

fn spawn_slime(world: &mut World, rng: &mut ChaCha8Rng) -> EntityId {
    let position = spread(rng, ARENA_EXTENT);
    let hp = 5.0 + unit(rng) * 25.0;
    let bounty = (rng.next_u64() % 10) as u32;
    world.spawn(
        Entity::new("slime", position)
            .with_layer(ENEMY_LAYER)
            .with_health(Health::new(hp))
            .with_bounty(bounty),
    )
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => JanitorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => JanitorConfig::default(),
    };
    logging::init_tracing(&config.logging);

    println!("Starting fuzz harness on seed {} for {} ticks...", args.seed, args.ticks);
    let library = AbilityLibrary::builtin();
    let mut loadout = Loadout::new(LOADOUT.len());
    for (slot, name) in LOADOUT.iter().enumerate() {
        let ability = library.get(name).with_context(|| format!("missing builtin ability {name}"))?;
        loadout.equip(slot, ability);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut world = World::new(config.simulation).context("Invalid simulation settings")?;
    let passives = PassiveBonuses { speed: 1.1, gold: 1.2, ..PassiveBonuses::default() };
    let mut janitor_state = CasterState::new(ResourcePool::new(100.0, 8.0), loadout);
    janitor_state.profile.passives = passives;
    let janitor = world.spawn(
        Entity::new("janitor", Vec2::ZERO)
            .with_health(Health::new(100.0).with_current(40.0))
            .with_caster(janitor_state),
    );
    let speed = passives.move_speed(BASE_SPEED);
    let mut slimes: Vec<EntityId> = (0..SLIME_COUNT).map(|_| spawn_slime(&mut world, &mut rng)).collect();
    let mut gold = 0u32;

    let mut casts = 0u32;
    let mut rejected = 0u32;
    for tick in 0..args.ticks {
        match rng.next_u64() % 5 {
            0 => {
                let slot = (rng.next_u64() % LOADOUT.len() as u64) as usize;
                match world.try_use_equipped_ability(janitor, slot) {
                    Ok(_) => casts += 1,
                    Err(_) => rejected += 1,
                }
            }
            1 => {
                let facing = spread(&mut rng, 1.0).normalized().unwrap_or(Vec2::RIGHT);
                if let Some(entity) = world.entity_mut(janitor) {
                    entity.facing = facing;
                }
            }
            2 => {
                if let Some(entity) = world.entity_mut(janitor) {
                    let stride = entity.position + entity.facing * (speed * DT);
                    entity.position = Vec2::new(
                        stride.x.clamp(-ARENA_EXTENT, ARENA_EXTENT),
                        stride.y.clamp(-ARENA_EXTENT, ARENA_EXTENT),
                    );
                }
            }
            3 => {
                let index = (rng.next_u64() % slimes.len() as u64) as usize;
                if world.entity(slimes[index]).is_none_or(Entity::is_dead) {
                    world.despawn(slimes[index]);
                    slimes[index] = spawn_slime(&mut world, &mut rng);
                }
            }
            _ => {}
        }

        world.tick(DT);
        check_invariants(&world).with_context(|| format!("invariant broken at tick {tick}"))?;
        for event in world.drain_events() {
            if let WorldEvent::GoldAwarded { amount, .. } = event {
                gold += amount;
            }
        }
    }

    println!("Fuzzing completed: {casts} casts, {rejected} rejected, {gold} gold earned.");
    Ok(())
}

fn check_invariants(world: &World) -> Result<()> {
    for entity in world.entities() {
        if let Some(health) = &entity.health {
            ensure!(
                (0.0..=health.max()).contains(&health.current()),
                "{} health {} outside [0, {}]",
                entity.name,
                health.current(),
                health.max()
            );
        }
        if let Some(pool) = entity.caster.as_ref().and_then(|caster| caster.resource.as_ref()) {
            ensure!(
                (0.0..=pool.max()).contains(&pool.current()),
                "{} resource {} outside [0, {}]",
                entity.name,
                pool.current(),
                pool.max()
            );
        }
    }
    for (task, heal) in world.heal_tasks() {
        let alive = world.entity(heal.target).is_some_and(|entity| !entity.is_dead());
        ensure!(alive, "heal task {task:?} targets a dead or missing entity");
    }
    Ok(())
}
