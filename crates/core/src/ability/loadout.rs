//! Equip slots for a caster.

use std::sync::Arc;

use tracing::warn;

use super::definition::AbilityDefinition;

pub const DEFAULT_ABILITY_SLOTS: usize = 3;

#[derive(Clone, Debug)]
pub struct Loadout {
    slots: Vec<Option<Arc<AbilityDefinition>>>,
}

impl Default for Loadout {
    fn default() -> Self {
        Self::new(DEFAULT_ABILITY_SLOTS)
    }
}

impl Loadout {
    pub fn new(slot_count: usize) -> Self {
        Self { slots: vec![None; slot_count] }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns false when `slot` does not exist.
    pub fn equip(&mut self, slot: usize, ability: Arc<AbilityDefinition>) -> bool {
        let Some(entry) = self.slots.get_mut(slot) else {
            warn!(slot, slot_count = self.slots.len(), ability = %ability.name, "equip slot out of range");
            return false;
        };
        *entry = Some(ability);
        true
    }

    pub fn unequip(&mut self, slot: usize) -> Option<Arc<AbilityDefinition>> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Ability in `slot`; absent when the slot is empty or out of range.
    pub fn ability(&self, slot: usize) -> Option<&Arc<AbilityDefinition>> {
        match self.slots.get(slot) {
            Some(entry) => entry.as_ref(),
            None => {
                warn!(slot, slot_count = self.slots.len(), "ability slot out of range");
                None
            }
        }
    }

    pub fn equipped(&self) -> impl Iterator<Item = (usize, &Arc<AbilityDefinition>)> {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| entry.as_ref().map(|ability| (slot, ability)))
    }

    pub fn equipped_count(&self) -> usize {
        self.slots.iter().filter(|entry| entry.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::TargetingMode;

    fn ability(name: &str) -> Arc<AbilityDefinition> {
        Arc::new(AbilityDefinition::new(name, TargetingMode::SelfCast))
    }

    #[test]
    fn default_loadout_has_three_empty_slots() {
        let loadout = Loadout::default();
        assert_eq!(loadout.slot_count(), 3);
        assert_eq!(loadout.equipped_count(), 0);
        assert!(loadout.ability(0).is_none());
    }

    #[test]
    fn equip_rejects_out_of_range_slots() {
        let mut loadout = Loadout::default();
        assert!(!loadout.equip(3, ability("Mop Sweep")));
        assert!(loadout.ability(3).is_none());
        assert!(loadout.equip(2, ability("Mop Sweep")));
        assert_eq!(loadout.ability(2).map(|a| a.name.as_str()), Some("Mop Sweep"));
    }

    #[test]
    fn unequip_clears_slot_and_returns_ability() {
        let mut loadout = Loadout::default();
        loadout.equip(0, ability("Broom Jab"));
        loadout.equip(1, ability("Soap Bolt"));
        let slots: Vec<_> = loadout.equipped().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![0, 1]);
        assert_eq!(loadout.unequip(0).map(|a| a.name.clone()), Some("Broom Jab".to_string()));
        assert!(loadout.unequip(0).is_none());
        assert!(loadout.unequip(9).is_none());
        assert_eq!(loadout.equipped_count(), 1);
    }
}
