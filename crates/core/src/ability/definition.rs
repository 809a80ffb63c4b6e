//! Immutable cast-time configuration for an ability.

use serde::{Deserialize, Serialize};

use super::effect::EffectDefinition;
use crate::types::LayerMask;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingMode {
    #[serde(rename = "Self")]
    SelfCast,
    RaycastSingle,
    Projectile,
    AreaOfEffect,
}

impl TargetingMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::SelfCast => "Self",
            Self::RaycastSingle => "RaycastSingle",
            Self::Projectile => "Projectile",
            Self::AreaOfEffect => "AreaOfEffect",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileParams {
    /// Visual handle for the spawner. The core never interprets it.
    pub prefab: String,
    pub speed: f32,
    /// Seconds of flight; falls back to the simulation default when absent.
    #[serde(default)]
    pub lifetime: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub cooldown_seconds: f32,
    #[serde(default)]
    pub resource_cost: f32,
    pub targeting: TargetingMode,
    #[serde(default)]
    pub range: Option<f32>,
    #[serde(default)]
    pub hit_layers: LayerMask,
    #[serde(default)]
    pub effects: Vec<EffectDefinition>,
    #[serde(default)]
    pub projectile: Option<ProjectileParams>,
}

impl AbilityDefinition {
    pub fn new(name: impl Into<String>, targeting: TargetingMode) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            icon: None,
            cooldown_seconds: 0.0,
            resource_cost: 0.0,
            targeting,
            range: None,
            hit_layers: LayerMask::ALL,
            effects: Vec::new(),
            projectile: None,
        }
    }

    /// Configured range, or `fallback` when unset or not positive.
    pub fn range_or(&self, fallback: f32) -> f32 {
        self.range.filter(|range| *range > 0.0).unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_falls_back_when_unset_or_zero() {
        let mut ability = AbilityDefinition::new("Mop Sweep", TargetingMode::AreaOfEffect);
        assert_eq!(ability.range_or(100.0), 100.0);
        ability.range = Some(0.0);
        assert_eq!(ability.range_or(100.0), 100.0);
        ability.range = Some(3.0);
        assert_eq!(ability.range_or(100.0), 3.0);
    }

    #[test]
    fn self_targeting_uses_its_display_name_in_json() {
        let ability: AbilityDefinition =
            serde_json::from_str(r#"{ "name": "Second Wind", "targeting": "Self" }"#).unwrap();
        assert_eq!(ability.targeting, TargetingMode::SelfCast);
        assert_eq!(ability.hit_layers, LayerMask::ALL);
        assert!(ability.effects.is_empty());
    }
}
