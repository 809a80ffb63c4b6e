//! Health pool clamped to `[0, max]` with a one-shot death report.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthRounding {
    #[default]
    Exact,
    /// Amounts are rounded to whole points before they are applied.
    WholePoints,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    pub applied: f32,
    /// True only for the hit that brought the pool to zero.
    pub died: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
    rounding: HealthRounding,
    death_reported: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max, rounding: HealthRounding::Exact, death_reported: false }
    }

    pub fn with_current(mut self, current: f32) -> Self {
        self.current = current.clamp(0.0, self.max);
        self
    }

    pub fn with_rounding(mut self, rounding: HealthRounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn rounding(&self) -> HealthRounding {
        self.rounding
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 { self.current / self.max } else { 0.0 }
    }

    /// The amount this pool would apply for `amount`, before clamping.
    pub fn normalize(&self, amount: f32) -> f32 {
        match self.rounding {
            HealthRounding::Exact => amount,
            HealthRounding::WholePoints => amount.round(),
        }
    }

    /// No-op (`None`) on a dead pool or a non-positive amount.
    pub fn take_damage(&mut self, amount: f32) -> Option<DamageOutcome> {
        let amount = self.normalize(amount);
        if self.is_dead() || amount.is_nan() || amount <= 0.0 {
            return None;
        }
        let before = self.current;
        self.current = (self.current - amount).max(0.0);
        let died = self.is_dead() && !self.death_reported;
        self.death_reported |= died;
        Some(DamageOutcome { applied: before - self.current, died })
    }

    /// Returns the amount actually restored; `None` when nothing changed.
    pub fn heal(&mut self, amount: f32) -> Option<f32> {
        let amount = self.normalize(amount);
        if self.is_dead() || amount.is_nan() || amount <= 0.0 {
            return None;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        let restored = self.current - before;
        (restored > 0.0).then_some(restored)
    }

    /// Changes the cap and keeps the same fraction of it filled.
    pub fn rescale_max(&mut self, max: f32) {
        let fraction = self.fraction();
        self.max = max.max(0.0);
        self.current = self.normalize(self.max * fraction).clamp(0.0, self.max);
    }

    /// Changes the cap, keeping `current` inside it.
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overkill_clamps_to_zero_and_reports_death_once() {
        let mut health = Health::new(20.0).with_current(10.0);
        let outcome = health.take_damage(15.0).expect("alive target takes damage");
        assert_eq!(outcome, DamageOutcome { applied: 10.0, died: true });
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());

        assert_eq!(health.take_damage(5.0), None);
        assert_eq!(health.heal(5.0), None);
        assert_eq!(health.current(), 0.0);
    }

    #[test]
    fn non_positive_amounts_are_ignored() {
        let mut health = Health::new(20.0).with_current(10.0);
        assert_eq!(health.take_damage(0.0), None);
        assert_eq!(health.take_damage(-3.0), None);
        assert_eq!(health.heal(0.0), None);
        assert_eq!(health.heal(f32::NAN), None);
        assert_eq!(health.current(), 10.0);
    }

    #[test]
    fn heal_clamps_at_max() {
        let mut health = Health::new(20.0).with_current(18.0);
        assert_eq!(health.heal(5.0), Some(2.0));
        assert_eq!(health.heal(1.0), None);
        assert_eq!(health.current(), 20.0);
    }

    #[test]
    fn whole_point_pools_round_amounts() {
        let mut health = Health::new(20.0).with_rounding(HealthRounding::WholePoints);
        assert_eq!(health.take_damage(2.6).map(|outcome| outcome.applied), Some(3.0));
        assert_eq!(health.take_damage(0.4), None);
        assert_eq!(health.heal(1.5), Some(2.0));
        assert_eq!(health.current(), 19.0);
    }

    #[test]
    fn rescaling_keeps_the_filled_fraction() {
        let mut health = Health::new(20.0).with_current(10.0);
        health.rescale_max(30.0);
        assert_eq!(health.max(), 30.0);
        assert_eq!(health.current(), 15.0);

        let mut whole = Health::new(20.0).with_current(7.0).with_rounding(HealthRounding::WholePoints);
        whole.rescale_max(21.0);
        assert_eq!(whole.current(), 7.0);
    }

    #[test]
    fn shrinking_max_clamps_current() {
        let mut health = Health::new(20.0);
        health.set_max(12.0);
        assert_eq!(health.current(), 12.0);
        assert_eq!(health.fraction(), 1.0);
    }
}
