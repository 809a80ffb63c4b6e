//! Long-lived simulation tasks: projectiles in flight and heals spread over time.

use std::sync::Arc;

use tracing::debug;

use super::{World, WorldEvent};
use crate::ability::{AbilityDefinition, CombatProfile};
use crate::types::{EntityId, HealTaskId, LayerMask, ProjectileId, Vec2};

const TIME_EPSILON: f32 = 1e-4;
/// Floor on heal pulse spacing so one tick lands a bounded number of pulses.
pub(super) const MIN_PULSE_INTERVAL: f32 = 1e-3;

#[derive(Clone, Debug)]
pub struct Projectile {
    pub caster: EntityId,
    pub ability: Arc<AbilityDefinition>,
    /// Caster modifiers captured at launch.
    pub profile: CombatProfile,
    pub prefab: String,
    pub position: Vec2,
    pub heading: Vec2,
    pub speed: f32,
    pub lifetime: f32,
    pub age: f32,
    pub radius: f32,
    pub hit_layers: LayerMask,
}

/// How a total heal is split into `pulses` pulses spaced one interval apart, the
/// first at cast time. Pulse `k` tops the running total up to `per_tick * (k + 1)`
/// and the last one tops it up to `total` exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealSchedule {
    pub total: f32,
    pub per_tick: f32,
    pub pulses: u32,
}

impl HealSchedule {
    /// `duration` and `interval` must be positive and finite.
    pub fn plan(total: f32, duration: f32, interval: f32) -> Self {
        let pulses = (duration / interval - TIME_EPSILON).ceil().max(1.0) as u32;
        let per_tick = total * interval / duration;
        Self { total, per_tick, pulses }
    }

    /// Running total owed once pulse `index` has landed.
    pub fn owed_after(&self, index: u32) -> f32 {
        if index + 1 >= self.pulses {
            self.total
        } else {
            (self.per_tick * (index + 1) as f32).min(self.total)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HealOverTime {
    pub caster: EntityId,
    pub target: EntityId,
    schedule: HealSchedule,
    interval: f32,
    next_pulse: u32,
    until_next: f32,
    delivered: f32,
}

impl HealOverTime {
    pub(crate) fn new(
        caster: EntityId,
        target: EntityId,
        schedule: HealSchedule,
        interval: f32,
    ) -> Self {
        Self {
            caster,
            target,
            schedule,
            interval,
            next_pulse: 0,
            until_next: 0.0,
            delivered: 0.0,
        }
    }

    pub fn schedule(&self) -> &HealSchedule {
        &self.schedule
    }

    /// Sum of pulses handed to the target's pool after its rounding, before the cap at max.
    pub fn delivered(&self) -> f32 {
        self.delivered
    }

    pub fn pending_pulses(&self) -> u32 {
        self.schedule.pulses.saturating_sub(self.next_pulse)
    }

    pub fn is_finished(&self) -> bool {
        self.pending_pulses() == 0
    }

    /// Amount of the next pulse if it is due, advancing the schedule past it.
    fn take_due(&mut self) -> Option<f32> {
        if self.is_finished() || self.until_next > TIME_EPSILON {
            return None;
        }
        let owed = self.schedule.owed_after(self.next_pulse) - self.delivered;
        self.next_pulse += 1;
        self.until_next += self.interval;
        Some(owed)
    }
}

impl World {
    pub(super) fn advance_projectiles(&mut self, dt: f32) {
        let ids: Vec<ProjectileId> = self.projectiles.keys().collect();
        for id in ids {
            let Some(projectile) = self.projectiles.get(id) else {
                continue;
            };
            let flight = dt.min((projectile.lifetime - projectile.age).max(0.0));
            let travel = projectile.speed * flight;
            let hit = self.sweep(
                projectile.position,
                projectile.heading,
                travel,
                projectile.radius,
                projectile.hit_layers,
                Some(projectile.caster),
            );

            if let Some(hit) = hit {
                let Some(projectile) = self.projectiles.remove(id) else {
                    continue;
                };
                debug!(?id, target = ?hit.entity, ability = %projectile.ability.name, "projectile hit");
                self.events.push(WorldEvent::ProjectileHit { projectile: id, target: hit.entity });
                self.apply_effects(
                    projectile.caster,
                    &projectile.profile,
                    hit.entity,
                    &projectile.ability.effects,
                    hit.point,
                );
                continue;
            }

            let Some(projectile) = self.projectiles.get_mut(id) else {
                continue;
            };
            projectile.position = projectile.position + projectile.heading * travel;
            projectile.age += dt;
            if projectile.age + TIME_EPSILON >= projectile.lifetime {
                self.projectiles.remove(id);
                debug!(?id, "projectile expired");
                self.events.push(WorldEvent::ProjectileExpired { projectile: id });
            }
        }
    }

    pub(super) fn advance_heal_tasks(&mut self, dt: f32) {
        let ids: Vec<HealTaskId> = self.heal_tasks.keys().collect();
        for id in ids {
            if let Some(task) = self.heal_tasks.get_mut(id) {
                task.until_next -= dt;
            }
            self.run_due_pulses(id);
        }
    }

    /// Lands every due pulse of `id`, then retires the task once it has no pulses left.
    pub(super) fn run_due_pulses(&mut self, id: HealTaskId) {
        loop {
            let Some(task) = self.heal_tasks.get_mut(id) else {
                return;
            };
            let target = task.target;
            if task.is_finished() {
                self.heal_tasks.remove(id);
                debug!(?id, "heal-over-time finished");
                self.events.push(WorldEvent::HealOverTimeFinished { task: id, target });
                return;
            }
            let Some(amount) = task.take_due() else {
                return;
            };

            let Some(sent) = self.heal_pulse(target, amount) else {
                self.heal_tasks.remove(id);
                debug!(?id, "heal-over-time cancelled");
                self.events.push(WorldEvent::HealOverTimeCancelled { task: id, target });
                return;
            };
            if let Some(task) = self.heal_tasks.get_mut(id) {
                task.delivered += sent;
            }
        }
    }

    /// Amount the target's pool accepted after rounding; `None` when the target is gone or dead.
    fn heal_pulse(&mut self, target: EntityId, amount: f32) -> Option<f32> {
        let health = self.entities.get_mut(target).and_then(|entity| entity.health.as_mut())?;
        if health.is_dead() {
            return None;
        }
        let sent = health.normalize(amount).max(0.0);
        if let Some(healed) = health.heal(amount) {
            self.events.push(WorldEvent::Healed { target, amount: healed });
        }
        Some(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_counts_cover_the_duration() {
        for (duration, pulses) in [(3.0_f32, 6), (1.2, 3), (1.5, 3), (0.3, 1), (0.5, 1)] {
            assert_eq!(HealSchedule::plan(10.0, duration, 0.5).pulses, pulses, "{duration}s");
        }
    }

    #[test]
    fn running_total_is_capped_and_ends_at_the_total() {
        let schedule = HealSchedule::plan(10.0, 1.2, 0.5);
        assert!((schedule.owed_after(0) - 10.0 / 2.4).abs() < 1e-5);
        assert!((schedule.owed_after(1) - 20.0 / 2.4).abs() < 1e-5);
        assert_eq!(schedule.owed_after(2), 10.0);
        assert_eq!(schedule.owed_after(9), 10.0);

        let short = HealSchedule::plan(7.0, 0.3, 0.5);
        assert_eq!(short.owed_after(0), 7.0);
    }

    #[test]
    fn pulses_wait_one_interval_after_the_first() {
        let schedule = HealSchedule::plan(12.0, 3.0, 0.5);
        let mut task = HealOverTime::new(EntityId::default(), EntityId::default(), schedule, 0.5);
        assert_eq!(task.pending_pulses(), 6);

        assert_eq!(task.take_due(), Some(2.0));
        task.delivered += 2.0;
        assert_eq!(task.take_due(), None);

        task.until_next -= 0.5;
        assert_eq!(task.take_due(), Some(2.0));
        assert_eq!(task.pending_pulses(), 4);
    }

    #[test]
    fn a_short_pulse_is_made_up_by_the_next_one() {
        let schedule = HealSchedule::plan(10.0, 1.5, 0.5);
        let mut task = HealOverTime::new(EntityId::default(), EntityId::default(), schedule, 0.5);
        let mut landed = 0.0;
        while !task.is_finished() {
            let owed = task.take_due().unwrap();
            let whole = owed.round();
            task.delivered += whole;
            landed += whole;
            task.until_next = 0.0;
        }
        assert_eq!(landed, 10.0);
    }
}
