//! Mana-style resource pool with continuous regeneration.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    current: f32,
    max: f32,
    regen_rate: f32,
    regenerates: bool,
}

impl ResourcePool {
    /// Starts full. Regenerates whenever `regen_rate` is positive.
    pub fn new(max: f32, regen_rate: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max, regen_rate, regenerates: regen_rate > 0.0 }
    }

    pub fn with_current(mut self, current: f32) -> Self {
        self.current = current.clamp(0.0, self.max);
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn regen_rate(&self) -> f32 {
        self.regen_rate
    }

    pub fn regenerates(&self) -> bool {
        self.regenerates
    }

    pub fn set_regenerates(&mut self, regenerates: bool) {
        self.regenerates = regenerates;
    }

    pub fn has_sufficient(&self, amount: f32) -> bool {
        self.current >= amount
    }

    /// Fails without mutating when the pool holds less than `amount`.
    pub fn spend(&mut self, amount: f32) -> bool {
        if amount.is_nan() || amount < 0.0 || !self.has_sufficient(amount) {
            return false;
        }
        self.current -= amount;
        true
    }

    pub fn add(&mut self, amount: f32) {
        if amount.is_finite() {
            self.current = (self.current + amount).clamp(0.0, self.max);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.regenerates || dt.is_nan() || dt <= 0.0 || self.current >= self.max {
            return;
        }
        self.current = (self.current + self.regen_rate * dt).min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overspend_leaves_pool_untouched() {
        let mut pool = ResourcePool::new(50.0, 5.0).with_current(8.0);
        assert!(!pool.spend(10.0));
        assert_eq!(pool.current(), 8.0);
        assert!(pool.spend(8.0));
        assert_eq!(pool.current(), 0.0);
        assert!(!pool.spend(-1.0));
    }

    #[test]
    fn regeneration_clamps_exactly_at_max() {
        let mut pool = ResourcePool::new(50.0, 7.0);
        assert!(pool.spend(20.0));
        for _ in 0..10 {
            pool.tick(1.0);
            assert!(pool.current() <= pool.max());
        }
        assert_eq!(pool.current(), 50.0);
    }

    #[test]
    fn non_regenerating_pools_stay_put() {
        let mut pool = ResourcePool::new(30.0, 0.0).with_current(10.0);
        assert!(!pool.regenerates());
        pool.tick(5.0);
        assert_eq!(pool.current(), 10.0);

        let mut paused = ResourcePool::new(30.0, 4.0).with_current(10.0);
        paused.set_regenerates(false);
        paused.tick(5.0);
        assert_eq!(paused.current(), 10.0);
    }

    #[test]
    fn add_clamps_into_range() {
        let mut pool = ResourcePool::new(10.0, 0.0).with_current(5.0);
        pool.add(100.0);
        assert_eq!(pool.current(), 10.0);
        pool.add(-100.0);
        assert_eq!(pool.current(), 0.0);
        assert!(pool.has_sufficient(0.0));
    }
}
