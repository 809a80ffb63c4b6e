//! Ability and effect definitions, content loading, equip slots and combat modifiers.

pub mod definition;
pub mod effect;
pub mod library;
pub mod loadout;
pub mod modifiers;

pub use definition::{AbilityDefinition, ProjectileParams, TargetingMode};
pub use effect::{EffectDefinition, EffectKind};
pub use library::{AbilityLibrary, ENEMY_LAYER, LibraryError, default_abilities};
pub use loadout::{DEFAULT_ABILITY_SLOTS, Loadout};
pub use modifiers::{
    CombatProfile, PassiveBonuses, PassiveKind, PassiveNode, WeaponClass, WeaponMultipliers,
};
