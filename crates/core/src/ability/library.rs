//! Ability content: loaded once, shared by `Arc`, never mutated afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::definition::{AbilityDefinition, ProjectileParams, TargetingMode};
use super::effect::EffectDefinition;
use crate::types::LayerMask;

/// Layer the built-in hostile abilities hit.
pub const ENEMY_LAYER: u8 = 1;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read ability library {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse ability library: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate ability name '{0}'")]
    Duplicate(String),
    #[error("ability '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

#[derive(Clone, Debug, Default)]
pub struct AbilityLibrary {
    abilities: BTreeMap<String, Arc<AbilityDefinition>>,
}

impl AbilityLibrary {
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = AbilityDefinition>,
    ) -> Result<Self, LibraryError> {
        let mut abilities = BTreeMap::new();
        for definition in definitions {
            validate(&definition)?;
            if abilities.contains_key(&definition.name) {
                return Err(LibraryError::Duplicate(definition.name));
            }
            abilities.insert(definition.name.clone(), Arc::new(definition));
        }
        debug!(count = abilities.len(), "ability library loaded");
        Ok(Self { abilities })
    }

    /// Parses a JSON array of ability definitions.
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        let definitions: Vec<AbilityDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let content = fs::read_to_string(path)
            .map_err(|source| LibraryError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&content)
    }

    pub fn builtin() -> Self {
        let abilities = default_abilities()
            .into_iter()
            .map(|definition| (definition.name.clone(), Arc::new(definition)))
            .collect();
        Self { abilities }
    }

    pub fn get(&self, name: &str) -> Option<Arc<AbilityDefinition>> {
        self.abilities.get(name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AbilityDefinition>> {
        self.abilities.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.abilities.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

fn validate(definition: &AbilityDefinition) -> Result<(), LibraryError> {
    let invalid = |reason: &str| LibraryError::Invalid {
        name: definition.name.clone(),
        reason: reason.to_string(),
    };
    if definition.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if !(definition.cooldown_seconds.is_finite() && definition.cooldown_seconds >= 0.0) {
        return Err(invalid("cooldown must be a non-negative number"));
    }
    if !(definition.resource_cost.is_finite() && definition.resource_cost >= 0.0) {
        return Err(invalid("resource cost must be a non-negative number"));
    }
    for effect in &definition.effects {
        if !effect.magnitude.is_finite() || !effect.scaling_factor.is_finite() {
            return Err(invalid("effect magnitude and scaling must be finite"));
        }
        if !(effect.duration_seconds.is_finite() && effect.duration_seconds >= 0.0) {
            return Err(invalid("effect duration must be a non-negative number"));
        }
    }
    if definition.targeting == TargetingMode::Projectile {
        match &definition.projectile {
            Some(projectile) if projectile.speed > 0.0 => {}
            Some(_) => return Err(invalid("projectile speed must be positive")),
            None => return Err(invalid("projectile targeting needs projectile parameters")),
        }
    }
    Ok(())
}

/// Starter abilities equipped by a fresh janitor.
pub fn default_abilities() -> Vec<AbilityDefinition> {
    let enemies = LayerMask::from_layers(&[ENEMY_LAYER]);
    vec![
        AbilityDefinition {
            name: "Broom Jab".into(),
            description: "A quick poke at whatever stands in front of you.".into(),
            icon: Some("broom".into()),
            cooldown_seconds: 0.8,
            resource_cost: 0.0,
            targeting: TargetingMode::RaycastSingle,
            range: Some(2.5),
            hit_layers: enemies,
            effects: vec![EffectDefinition::damage(8.0)],
            projectile: None,
        },
        AbilityDefinition {
            name: "Soap Bolt".into(),
            description: "Hurl a slick glob of soap down the corridor.".into(),
            icon: Some("soap".into()),
            cooldown_seconds: 2.0,
            resource_cost: 10.0,
            targeting: TargetingMode::Projectile,
            range: None,
            hit_layers: enemies,
            effects: vec![EffectDefinition::damage(12.0)],
            projectile: Some(ProjectileParams {
                prefab: "soap_bolt".into(),
                speed: 12.0,
                lifetime: Some(3.0),
            }),
        },
        AbilityDefinition {
            name: "Mop Sweep".into(),
            description: "Swing the mop in a wide circle.".into(),
            icon: Some("mop".into()),
            cooldown_seconds: 4.0,
            resource_cost: 15.0,
            targeting: TargetingMode::AreaOfEffect,
            range: Some(3.0),
            hit_layers: enemies,
            effects: vec![EffectDefinition::damage(6.0).scaled_by(1.25)],
            projectile: None,
        },
        AbilityDefinition {
            name: "Second Wind".into(),
            description: "Catch your breath and recover over a few seconds.".into(),
            icon: Some("lungs".into()),
            cooldown_seconds: 10.0,
            resource_cost: 20.0,
            targeting: TargetingMode::SelfCast,
            range: None,
            hit_layers: LayerMask::ALL,
            effects: vec![EffectDefinition::heal(12.0).over(3.0)],
            projectile: None,
        },
        AbilityDefinition {
            name: "Quick Patch".into(),
            description: "Slap a bandage on it.".into(),
            icon: Some("bandage".into()),
            cooldown_seconds: 6.0,
            resource_cost: 12.0,
            targeting: TargetingMode::SelfCast,
            range: None,
            hit_layers: LayerMask::ALL,
            effects: vec![EffectDefinition::heal(6.0)],
            projectile: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_set_passes_validation() {
        let library = AbilityLibrary::from_definitions(default_abilities()).unwrap();
        assert_eq!(library.len(), AbilityLibrary::builtin().len());
        assert!(library.get("Soap Bolt").is_some());
        assert!(library.get("Nope").is_none());
    }

    #[test]
    fn definitions_are_shared_not_copied() {
        let library = AbilityLibrary::builtin();
        let first = library.get("Broom Jab").unwrap();
        let second = library.get("Broom Jab").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = r#"[
            { "name": "Sweep", "targeting": "AreaOfEffect" },
            { "name": "Sweep", "targeting": "Self" }
        ]"#;
        assert!(matches!(AbilityLibrary::from_json(json), Err(LibraryError::Duplicate(name)) if name == "Sweep"));
    }

    #[test]
    fn projectile_without_parameters_is_invalid() {
        let json = r#"[{ "name": "Bolt", "targeting": "Projectile" }]"#;
        assert!(matches!(AbilityLibrary::from_json(json), Err(LibraryError::Invalid { .. })));

        let json = r#"[{
            "name": "Bolt",
            "targeting": "Projectile",
            "projectile": { "prefab": "bolt", "speed": 0.0 }
        }]"#;
        assert!(matches!(AbilityLibrary::from_json(json), Err(LibraryError::Invalid { .. })));
    }

    #[test]
    fn unbounded_effects_are_invalid() {
        let endless = AbilityDefinition {
            effects: vec![EffectDefinition::heal(5.0).over(f32::INFINITY)],
            ..AbilityDefinition::new("Endless Mop", TargetingMode::SelfCast)
        };
        assert!(matches!(
            AbilityLibrary::from_definitions(vec![endless]),
            Err(LibraryError::Invalid { name, .. }) if name == "Endless Mop"
        ));

        let huge = AbilityDefinition {
            effects: vec![EffectDefinition::damage(f32::NAN)],
            ..AbilityDefinition::new("Huge Mop", TargetingMode::SelfCast)
        };
        assert!(AbilityLibrary::from_definitions(vec![huge]).is_err());
    }

    #[test]
    fn loads_json_with_effects_and_layers() {
        let json = r#"[{
            "name": "Bucket Splash",
            "cooldown_seconds": 3.0,
            "resource_cost": 5.0,
            "targeting": "AreaOfEffect",
            "range": 2.0,
            "hit_layers": 6,
            "effects": [{ "kind": "Damage", "magnitude": 4.0, "scaling_factor": 2.0 }]
        }]"#;
        let library = AbilityLibrary::from_json(json).unwrap();
        let splash = library.get("Bucket Splash").unwrap();
        assert!(splash.hit_layers.contains(1));
        assert!(splash.hit_layers.contains(2));
        assert!(!splash.hit_layers.contains(0));
        assert_eq!(splash.effects[0].scaled_magnitude(), 8.0);
        assert!(matches!(AbilityLibrary::from_json("{"), Err(LibraryError::Parse(_))));
    }
}
