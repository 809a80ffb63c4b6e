//! Effect payloads carried by abilities. Application lives in the simulation's resolver.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Damage,
    Heal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    pub kind: EffectKind,
    pub magnitude: f32,
    /// 0 applies instantly; a positive duration spreads a heal over periodic ticks.
    #[serde(default)]
    pub duration_seconds: f32,
    #[serde(default = "default_scaling_factor")]
    pub scaling_factor: f32,
}

fn default_scaling_factor() -> f32 {
    1.0
}

impl EffectDefinition {
    pub fn damage(magnitude: f32) -> Self {
        Self { kind: EffectKind::Damage, magnitude, duration_seconds: 0.0, scaling_factor: 1.0 }
    }

    pub fn heal(magnitude: f32) -> Self {
        Self { kind: EffectKind::Heal, magnitude, duration_seconds: 0.0, scaling_factor: 1.0 }
    }

    pub fn over(mut self, duration_seconds: f32) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn scaled_by(mut self, scaling_factor: f32) -> Self {
        self.scaling_factor = scaling_factor;
        self
    }

    pub fn scaled_magnitude(&self) -> f32 {
        self.magnitude * self.scaling_factor
    }

    pub fn is_over_time(&self) -> bool {
        self.duration_seconds > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_magnitude_multiplies_scaling_factor() {
        let effect = EffectDefinition::damage(8.0).scaled_by(1.5);
        assert_eq!(effect.scaled_magnitude(), 12.0);
        assert!(!effect.is_over_time());
        assert!(EffectDefinition::heal(10.0).over(3.0).is_over_time());
    }

    #[test]
    fn json_defaults_to_instant_unscaled_effect() {
        let effect: EffectDefinition =
            serde_json::from_str(r#"{ "kind": "Heal", "magnitude": 4.0 }"#).unwrap();
        assert_eq!(effect, EffectDefinition::heal(4.0));
    }
}
