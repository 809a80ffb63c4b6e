//! Ability use: validate, resolve targets, apply effects, then charge cost and cooldown.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace, warn};

use super::tasks::{HealOverTime, HealSchedule, MIN_PULSE_INTERVAL, Projectile};
use super::{World, WorldEvent};
use crate::ability::{AbilityDefinition, CombatProfile, EffectDefinition, EffectKind, TargetingMode};
use crate::types::{EntityId, ProjectileId, Vec2};

/// Where an ability is cast from and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastPoint {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl CastPoint {
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CastOutcome {
    /// Effects were applied to these targets, in resolution order.
    Applied { targets: Vec<EntityId> },
    Launched { projectile: ProjectileId },
    /// Raycast or area query found nothing. Nothing was charged.
    NoTargets,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CastReport {
    pub ability: String,
    pub outcome: CastOutcome,
    pub resource_spent: f32,
    pub cooldown_started: f32,
}

impl CastReport {
    pub fn charged(&self) -> bool {
        !matches!(self.outcome, CastOutcome::NoTargets)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum CastFailure {
    #[error("caster does not exist")]
    UnknownCaster,
    #[error("{caster} cannot use abilities")]
    NotACaster { caster: String },
    #[error("{caster} has no resource pool; abilities are disabled")]
    CasterDisabled { caster: String },
    #[error("ability slot {slot} is out of range ({slot_count} slots)")]
    InvalidSlot { slot: usize, slot_count: usize },
    #[error("no ability equipped in slot {slot}")]
    NoAbilityEquipped { slot: usize },
    #[error("{ability} is on cooldown! {remaining:.1}s remaining")]
    OnCooldown { ability: String, remaining: f32 },
    #[error("not enough mana to use {ability}! need: {needed}, have: {available}")]
    InsufficientResource { ability: String, needed: f32, available: f32 },
    #[error("{ability} has no projectile configured")]
    MissingProjectile { ability: String },
}

enum Resolved {
    Targets(Vec<(EntityId, Vec2)>),
    Projectile(Projectile),
    Nothing,
}

impl World {
    /// Uses the ability in `slot` from the caster's own position and facing.
    pub fn try_use_equipped_ability(
        &mut self,
        caster: EntityId,
        slot: usize,
    ) -> Result<CastReport, CastFailure> {
        let lookup = self.equipped_ability(caster, slot).map(|(ability, cast)| (ability.clone(), cast));
        match lookup {
            Ok((ability, cast)) => self.use_ability(caster, &ability, cast),
            Err(failure) => Err(self.reject(caster, failure)),
        }
    }

    fn equipped_ability(
        &self,
        caster: EntityId,
        slot: usize,
    ) -> Result<(&Arc<AbilityDefinition>, CastPoint), CastFailure> {
        let entity = self.entities.get(caster).ok_or(CastFailure::UnknownCaster)?;
        let state = entity
            .caster
            .as_ref()
            .ok_or_else(|| CastFailure::NotACaster { caster: entity.name.clone() })?;
        let slot_count = state.loadout.slot_count();
        if slot >= slot_count {
            return Err(CastFailure::InvalidSlot { slot, slot_count });
        }
        let ability = state.loadout.ability(slot).ok_or(CastFailure::NoAbilityEquipped { slot })?;
        Ok((ability, CastPoint::new(entity.position, entity.facing)))
    }

    /// Runs one ability use. Failures leave the world untouched apart from the failure event.
    pub fn use_ability(
        &mut self,
        caster: EntityId,
        ability: &Arc<AbilityDefinition>,
        cast: CastPoint,
    ) -> Result<CastReport, CastFailure> {
        if let Err(failure) = self.validate(caster, ability) {
            return Err(self.reject(caster, failure));
        }
        let profile = match self.entities.get(caster).and_then(|entity| entity.caster.as_ref()) {
            Some(state) => state.profile,
            None => return Err(self.reject(caster, CastFailure::UnknownCaster)),
        };

        let resolved = match self.resolve_targets(caster, ability, &profile, cast) {
            Ok(resolved) => resolved,
            Err(failure) => return Err(self.reject(caster, failure)),
        };

        let outcome = match resolved {
            Resolved::Nothing => {
                debug!(ability = %ability.name, "ability found no targets");
                return Ok(CastReport {
                    ability: ability.name.clone(),
                    outcome: CastOutcome::NoTargets,
                    resource_spent: 0.0,
                    cooldown_started: 0.0,
                });
            }
            Resolved::Targets(targets) => {
                for &(target, point) in &targets {
                    self.apply_effects(caster, &profile, target, &ability.effects, point);
                }
                CastOutcome::Applied { targets: targets.into_iter().map(|(target, _)| target).collect() }
            }
            Resolved::Projectile(projectile) => {
                let id = self.projectiles.insert(projectile);
                self.events.push(WorldEvent::ProjectileLaunched { projectile: id, caster });
                CastOutcome::Launched { projectile: id }
            }
        };

        self.commit(caster, ability);
        let targets = match &outcome {
            CastOutcome::Applied { targets } => targets.len(),
            _ => 0,
        };
        self.events.push(WorldEvent::AbilityUsed {
            caster,
            ability: ability.name.clone(),
            targets,
        });
        Ok(CastReport {
            ability: ability.name.clone(),
            outcome,
            resource_spent: ability.resource_cost,
            cooldown_started: ability.cooldown_seconds,
        })
    }

    fn validate(&self, caster: EntityId, ability: &AbilityDefinition) -> Result<(), CastFailure> {
        let entity = self.entities.get(caster).ok_or(CastFailure::UnknownCaster)?;
        let state = entity
            .caster
            .as_ref()
            .ok_or_else(|| CastFailure::NotACaster { caster: entity.name.clone() })?;
        let pool = state
            .resource
            .as_ref()
            .ok_or_else(|| CastFailure::CasterDisabled { caster: entity.name.clone() })?;

        let remaining = state.cooldowns.remaining(&ability.name);
        if remaining > 0.0 {
            return Err(CastFailure::OnCooldown { ability: ability.name.clone(), remaining });
        }
        if !pool.has_sufficient(ability.resource_cost) {
            return Err(CastFailure::InsufficientResource {
                ability: ability.name.clone(),
                needed: ability.resource_cost,
                available: pool.current(),
            });
        }
        Ok(())
    }

    fn resolve_targets(
        &self,
        caster: EntityId,
        ability: &Arc<AbilityDefinition>,
        profile: &CombatProfile,
        cast: CastPoint,
    ) -> Result<Resolved, CastFailure> {
        let fallback = self.settings.default_range;
        let resolved = match ability.targeting {
            TargetingMode::SelfCast => {
                let position = self.entities.get(caster).map_or(cast.origin, |entity| entity.position);
                Resolved::Targets(vec![(caster, position)])
            }
            TargetingMode::RaycastSingle => {
                let hit = self.raycast(
                    cast.origin,
                    cast.direction,
                    ability.range_or(fallback),
                    ability.hit_layers,
                    Some(caster),
                );
                match hit {
                    Some(hit) => Resolved::Targets(vec![(hit.entity, hit.point)]),
                    None => Resolved::Nothing,
                }
            }
            TargetingMode::AreaOfEffect => {
                let targets: Vec<_> = self
                    .overlap_circle(cast.origin, ability.range_or(fallback), ability.hit_layers)
                    .into_iter()
                    .filter_map(|id| self.entities.get(id).map(|entity| (id, entity.position)))
                    .collect();
                if targets.is_empty() { Resolved::Nothing } else { Resolved::Targets(targets) }
            }
            TargetingMode::Projectile => {
                let params = ability
                    .projectile
                    .as_ref()
                    .ok_or_else(|| CastFailure::MissingProjectile { ability: ability.name.clone() })?;
                let heading = cast.direction.normalized().unwrap_or(Vec2::RIGHT);
                Resolved::Projectile(Projectile {
                    caster,
                    ability: Arc::clone(ability),
                    profile: *profile,
                    prefab: params.prefab.clone(),
                    position: cast.origin,
                    heading,
                    speed: params.speed,
                    lifetime: params
                        .lifetime
                        .filter(|lifetime| *lifetime > 0.0)
                        .unwrap_or(self.settings.default_projectile_lifetime),
                    age: 0.0,
                    radius: self.settings.projectile_radius,
                    hit_layers: ability.hit_layers,
                })
            }
        };
        Ok(resolved)
    }

    fn commit(&mut self, caster: EntityId, ability: &AbilityDefinition) {
        let Some(state) = self.entities.get_mut(caster).and_then(|entity| entity.caster.as_mut())
        else {
            return;
        };
        if let Some(pool) = state.resource.as_mut()
            && !pool.spend(ability.resource_cost)
        {
            warn!(ability = %ability.name, "resource changed between validation and commit");
        }
        if ability.cooldown_seconds > 0.0 {
            state.cooldowns.start(&ability.name, ability.cooldown_seconds);
            self.events.push(WorldEvent::CooldownStarted {
                caster,
                ability: ability.name.clone(),
                seconds: ability.cooldown_seconds,
            });
        }
    }

    fn reject(&mut self, caster: EntityId, failure: CastFailure) -> CastFailure {
        debug!(reason = %failure, "ability use rejected");
        self.events.push(WorldEvent::AbilityFailed { caster, reason: failure.to_string() });
        failure
    }

    /// Applies each effect in order. Missing or dead targets turn every effect into a no-op.
    pub(crate) fn apply_effects(
        &mut self,
        caster: EntityId,
        profile: &CombatProfile,
        target: EntityId,
        effects: &[EffectDefinition],
        hit_point: Vec2,
    ) {
        for effect in effects {
            trace!(?target, kind = ?effect.kind, x = hit_point.x, y = hit_point.y, "applying effect");
            match effect.kind {
                EffectKind::Damage => self.apply_damage(caster, profile, target, effect),
                EffectKind::Heal => self.apply_heal(caster, profile, target, effect),
            }
        }
    }

    fn apply_damage(
        &mut self,
        caster: EntityId,
        profile: &CombatProfile,
        target: EntityId,
        effect: &EffectDefinition,
    ) {
        let amount = profile.final_damage(effect.scaled_magnitude());
        let Some(entity) = self.entities.get_mut(target) else {
            return;
        };
        let Some(health) = entity.health.as_mut() else {
            debug!(target = %entity.name, "damage target has no health");
            return;
        };
        let Some(outcome) = health.take_damage(amount) else {
            return;
        };
        self.events.push(WorldEvent::Damaged { target, amount: outcome.applied });
        if outcome.died {
            debug!(target = %entity.name, "entity died");
            let gold = profile.passives.gold_reward(entity.bounty);
            self.events.push(WorldEvent::Died { entity: target });
            if gold > 0 {
                self.events.push(WorldEvent::GoldAwarded { caster, amount: gold });
            }
            self.cancel_heals_on(target);
        }
    }

    fn apply_heal(
        &mut self,
        caster: EntityId,
        profile: &CombatProfile,
        target: EntityId,
        effect: &EffectDefinition,
    ) {
        let amount = effect.scaled_magnitude() * profile.heal_scale();
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        let Some(health) = self.entities.get_mut(target).and_then(|entity| entity.health.as_mut())
        else {
            debug!(?target, "heal target has no health");
            return;
        };
        if health.is_dead() {
            return;
        }

        if !effect.is_over_time() {
            if let Some(healed) = health.heal(amount) {
                self.events.push(WorldEvent::Healed { target, amount: healed });
            }
            return;
        }

        if !effect.duration_seconds.is_finite() {
            warn!(?target, duration = effect.duration_seconds, "heal-over-time needs a finite duration");
            return;
        }
        let interval = self.settings.heal_tick_interval.max(MIN_PULSE_INTERVAL);
        let schedule = HealSchedule::plan(amount, effect.duration_seconds, interval);
        let task = self.heal_tasks.insert(HealOverTime::new(caster, target, schedule, interval));
        debug!(?task, total = amount, duration = effect.duration_seconds, "heal-over-time started");
        self.events.push(WorldEvent::HealOverTimeStarted { task, target, total: amount });
        self.run_due_pulses(task);
    }
}
