//! Per-caster cooldown timers keyed by ability name.

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CooldownTracker {
    remaining: BTreeMap<String, f32>,
}

impl CooldownTracker {
    pub fn is_ready(&self, ability: &str) -> bool {
        self.remaining(ability) <= 0.0
    }

    pub fn remaining(&self, ability: &str) -> f32 {
        self.remaining.get(ability).copied().unwrap_or(0.0)
    }

    pub fn start(&mut self, ability: &str, seconds: f32) {
        if seconds > 0.0 {
            self.remaining.insert(ability.to_string(), seconds);
        } else {
            self.remaining.remove(ability);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        for remaining in self.remaining.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
        self.remaining.retain(|_, remaining| *remaining > 0.0);
    }

    pub fn active_count(&self) -> usize {
        self.remaining.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_reaches_zero_and_clears() {
        let mut cooldowns = CooldownTracker::default();
        cooldowns.start("Mop Sweep", 1.0);
        assert!(!cooldowns.is_ready("Mop Sweep"));
        assert!(cooldowns.is_ready("Broom Jab"));

        cooldowns.tick(0.4);
        assert!((cooldowns.remaining("Mop Sweep") - 0.6).abs() < 1e-6);
        cooldowns.tick(0.4);
        cooldowns.tick(0.4);
        assert_eq!(cooldowns.remaining("Mop Sweep"), 0.0);
        assert!(cooldowns.is_ready("Mop Sweep"));
        assert_eq!(cooldowns.active_count(), 0);
    }

    #[test]
    fn zero_second_cooldowns_are_not_tracked() {
        let mut cooldowns = CooldownTracker::default();
        cooldowns.start("Broom Jab", 0.0);
        assert_eq!(cooldowns.active_count(), 0);
        cooldowns.tick(-1.0);
        assert!(cooldowns.is_ready("Broom Jab"));
    }
}
