//! Entity arena, per-tick timers and ability resolution.
//!
//! Everything runs on the caller's thread. Long-lived work (projectiles and
//! heal-over-time) is kept as plain task records polled by [`World::tick`].

pub mod cooldown;
pub mod health;
pub mod resource;

mod resolution;
mod spatial;
mod tasks;

use std::mem;

use slotmap::SlotMap;
use tracing::{debug, warn};

pub use cooldown::CooldownTracker;
pub use health::{DamageOutcome, Health, HealthRounding};
pub use resolution::{CastFailure, CastOutcome, CastPoint, CastReport};
pub use resource::ResourcePool;
pub use spatial::RayHit;
pub use tasks::{HealOverTime, HealSchedule, Projectile};

use crate::ability::{CombatProfile, Loadout};
use crate::config::{ConfigError, SimulationSettings};
use crate::types::{EntityId, HealTaskId, ProjectileId, Vec2};

#[derive(Clone, Debug)]
pub struct CasterState {
    /// A caster without a pool has its abilities disabled.
    pub resource: Option<ResourcePool>,
    pub cooldowns: CooldownTracker,
    pub loadout: Loadout,
    pub profile: CombatProfile,
}

impl CasterState {
    pub fn new(resource: ResourcePool, loadout: Loadout) -> Self {
        Self {
            resource: Some(resource),
            cooldowns: CooldownTracker::default(),
            loadout,
            profile: CombatProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: CombatProfile) -> Self {
        self.profile = profile;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub position: Vec2,
    pub facing: Vec2,
    pub layer: u8,
    pub radius: f32,
    pub health: Option<Health>,
    pub caster: Option<CasterState>,
    /// Base gold paid to whoever lands the killing blow.
    pub bounty: u32,
}

impl Entity {
    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: EntityId::default(),
            name: name.into(),
            position,
            facing: Vec2::RIGHT,
            layer: 0,
            radius: 0.5,
            health: None,
            caster: None,
            bounty: 0,
        }
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    pub fn with_facing(mut self, facing: Vec2) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_health(mut self, health: Health) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_caster(mut self, caster: CasterState) -> Self {
        self.caster = Some(caster);
        self
    }

    pub fn with_bounty(mut self, bounty: u32) -> Self {
        self.bounty = bounty;
        self
    }

    pub fn is_dead(&self) -> bool {
        self.health.as_ref().is_some_and(Health::is_dead)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    Damaged { target: EntityId, amount: f32 },
    Healed { target: EntityId, amount: f32 },
    Died { entity: EntityId },
    GoldAwarded { caster: EntityId, amount: u32 },
    AbilityUsed { caster: EntityId, ability: String, targets: usize },
    AbilityFailed { caster: EntityId, reason: String },
    CooldownStarted { caster: EntityId, ability: String, seconds: f32 },
    ProjectileLaunched { projectile: ProjectileId, caster: EntityId },
    ProjectileHit { projectile: ProjectileId, target: EntityId },
    ProjectileExpired { projectile: ProjectileId },
    HealOverTimeStarted { task: HealTaskId, target: EntityId, total: f32 },
    HealOverTimeFinished { task: HealTaskId, target: EntityId },
    HealOverTimeCancelled { task: HealTaskId, target: EntityId },
}

pub struct World {
    settings: SimulationSettings,
    entities: SlotMap<EntityId, Entity>,
    projectiles: SlotMap<ProjectileId, Projectile>,
    heal_tasks: SlotMap<HealTaskId, HealOverTime>,
    events: Vec<WorldEvent>,
    elapsed: f32,
}

impl Default for World {
    fn default() -> Self {
        Self::with_checked_settings(SimulationSettings::default())
    }
}

impl World {
    pub fn new(settings: SimulationSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::with_checked_settings(settings))
    }

    fn with_checked_settings(settings: SimulationSettings) -> Self {
        Self {
            settings,
            entities: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            heal_tasks: SlotMap::with_key(),
            events: Vec::new(),
            elapsed: 0.0,
        }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(entity);
        let entity = &mut self.entities[id];
        entity.id = id;
        if let Some(caster) = &entity.caster
            && caster.resource.is_none()
        {
            warn!(entity = %entity.name, "caster has no resource pool; abilities disabled");
        }
        debug!(entity = %entity.name, "entity spawned");
        id
    }

    /// Removes an entity, cancelling its projectiles and any heal-over-time aimed at it.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        self.projectiles.retain(|_, projectile| projectile.caster != id);
        self.cancel_heals_on(id);
        debug!(entity = %entity.name, "entity despawned");
        Some(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn health(&self, id: EntityId) -> Option<&Health> {
        self.entities.get(id)?.health.as_ref()
    }

    pub fn resource(&self, id: EntityId) -> Option<&ResourcePool> {
        self.entities.get(id)?.caster.as_ref()?.resource.as_ref()
    }

    pub fn projectiles(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> {
        self.projectiles.iter()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn heal_tasks(&self) -> impl Iterator<Item = (HealTaskId, &HealOverTime)> {
        self.heal_tasks.iter()
    }

    pub fn heal_task_count(&self) -> usize {
        self.heal_tasks.len()
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        mem::take(&mut self.events)
    }

    /// Sets the entity's max health to `base_max` scaled by its caster's health passive,
    /// keeping the filled fraction. Returns the new max.
    pub fn apply_passive_health(&mut self, id: EntityId, base_max: f32) -> Option<f32> {
        let entity = self.entities.get_mut(id)?;
        let passives = entity.caster.as_ref().map(|caster| caster.profile.passives).unwrap_or_default();
        let health = entity.health.as_mut()?;
        health.rescale_max(passives.max_health(base_max));
        Some(health.max())
    }

    /// Cooldown left on the ability in `slot`; 0 for empty or unknown slots.
    pub fn slot_cooldown_remaining(&self, caster: EntityId, slot: usize) -> f32 {
        let Some(state) = self.entities.get(caster).and_then(|entity| entity.caster.as_ref())
        else {
            return 0.0;
        };
        state
            .loadout
            .ability(slot)
            .map_or(0.0, |ability| state.cooldowns.remaining(&ability.name))
    }

    pub fn is_slot_ready(&self, caster: EntityId, slot: usize) -> bool {
        self.slot_cooldown_remaining(caster, slot) <= 0.0
    }

    /// Whether the caster's pool covers the cost of the ability in `slot`.
    pub fn can_afford_slot(&self, caster: EntityId, slot: usize) -> bool {
        let Some(state) = self.entities.get(caster).and_then(|entity| entity.caster.as_ref())
        else {
            return false;
        };
        match (&state.resource, state.loadout.ability(slot)) {
            (Some(pool), Some(ability)) => pool.has_sufficient(ability.resource_cost),
            _ => false,
        }
    }

    /// One simulation step: regeneration, cooldowns, projectile flight, then heal-over-time.
    pub fn tick(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        for entity in self.entities.values_mut() {
            let Some(caster) = entity.caster.as_mut() else {
                continue;
            };
            if let Some(pool) = caster.resource.as_mut() {
                pool.tick(dt);
            }
            caster.cooldowns.tick(dt);
        }
        self.advance_projectiles(dt);
        self.advance_heal_tasks(dt);
        self.elapsed += dt;
    }

    pub(crate) fn cancel_heals_on(&mut self, target: EntityId) {
        let cancelled: Vec<HealTaskId> = self
            .heal_tasks
            .iter()
            .filter(|(_, task)| task.target == target)
            .map(|(id, _)| id)
            .collect();
        for task in cancelled {
            self.heal_tasks.remove(task);
            debug!(?task, "heal-over-time cancelled");
            self.events.push(WorldEvent::HealOverTimeCancelled { task, target });
        }
    }
}
