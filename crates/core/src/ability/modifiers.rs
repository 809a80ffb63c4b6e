//! Damage and heal modifiers: progression passives, weapon class multipliers and caster power.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveKind {
    BoldAttack,
    IronBody,
    SwiftSteps,
    TreasureHunter,
}

/// An unlocked node of the passive tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveNode {
    pub kind: PassiveKind,
    pub tier: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PassiveBonuses {
    pub damage: f32,
    pub health: f32,
    pub speed: f32,
    pub gold: f32,
}

impl Default for PassiveBonuses {
    fn default() -> Self {
        Self { damage: 1.0, health: 1.0, speed: 1.0, gold: 1.0 }
    }
}

impl PassiveBonuses {
    pub const TIER_STEP: f32 = 0.05;

    /// Only the highest unlocked tier of each kind counts.
    pub fn from_unlocked(nodes: &[PassiveNode]) -> Self {
        let best = |kind: PassiveKind| {
            nodes.iter().filter(|node| node.kind == kind).map(|node| node.tier).max().unwrap_or(0)
        };
        let multiplier = |kind| 1.0 + Self::TIER_STEP * f32::from(best(kind));
        Self {
            damage: multiplier(PassiveKind::BoldAttack),
            health: multiplier(PassiveKind::IronBody),
            speed: multiplier(PassiveKind::SwiftSteps),
            gold: multiplier(PassiveKind::TreasureHunter),
        }
    }

    pub fn max_health(&self, base: f32) -> f32 {
        base * self.health
    }

    pub fn move_speed(&self, base: f32) -> f32 {
        base * self.speed
    }

    /// Rounded to whole coins.
    pub fn gold_reward(&self, base: u32) -> u32 {
        (base as f32 * self.gold).round().max(0.0) as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    Melee,
    Ranged,
    Magic,
}

/// Shop upgrades per weapon class. Multipliers never drop below 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponMultipliers {
    melee: f32,
    ranged: f32,
    magic: f32,
}

impl Default for WeaponMultipliers {
    fn default() -> Self {
        Self { melee: 1.0, ranged: 1.0, magic: 1.0 }
    }
}

impl WeaponMultipliers {
    pub fn get(&self, class: WeaponClass) -> f32 {
        match class {
            WeaponClass::Melee => self.melee,
            WeaponClass::Ranged => self.ranged,
            WeaponClass::Magic => self.magic,
        }
    }

    pub fn set(&mut self, class: WeaponClass, multiplier: f32) {
        let clamped = if multiplier.is_finite() { multiplier.max(1.0) } else { 1.0 };
        match class {
            WeaponClass::Melee => self.melee = clamped,
            WeaponClass::Ranged => self.ranged = clamped,
            WeaponClass::Magic => self.magic = clamped,
        }
    }
}

/// Everything about a caster that scales the effects it applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatProfile {
    pub power: f32,
    pub passives: PassiveBonuses,
    pub weapon: Option<WeaponClass>,
    pub weapon_multipliers: WeaponMultipliers,
}

impl CombatProfile {
    /// Scaled magnitude, then the passive damage bonus, then the weapon class multiplier.
    pub fn final_damage(&self, scaled_magnitude: f32) -> f32 {
        let weapon = self.weapon.map_or(1.0, |class| self.weapon_multipliers.get(class));
        scaled_magnitude * self.passives.damage * weapon
    }

    pub fn heal_scale(&self) -> f32 {
        if self.power > 0.0 { 1.0 + self.power / 100.0 } else { 1.0 }
    }
}
