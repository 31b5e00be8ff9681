//! Immutable content definitions consumed by the engine.
//!
//! Effect documents inside these definitions are already parsed; see
//! [`crate::effects`]. The engine never mutates a definition.

use strum::{Display, IntoStaticStr};

use crate::combat::{DamageCategory, DamageType};
use crate::effects::{NodeModifier, SkillEffectSpec};
use crate::stats::{AffixKind, WeaponCategory};

/// An active skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSpec {
    pub id: String,
    pub name: String,
    /// Weapon family the skill requires, if any.
    pub weapon: Option<WeaponCategory>,
    /// Damage multiplier. Zero marks a utility skill that performs no attack.
    pub multiplier: f64,
    pub mana_cost: f64,
    pub cooldown: u32,
    pub required_level: u32,
    pub damage_type: DamageType,
    pub effect: SkillEffectSpec,
}

impl SkillSpec {
    /// True when casting resolves at least one attack.
    pub fn is_attack(&self) -> bool {
        self.multiplier > 0.0
    }

    /// Damage figure the skill draws from.
    ///
    /// Skills follow the weapon they require; unbound skills use melee.
    pub fn damage_category(&self) -> DamageCategory {
        self.weapon
            .map_or(DamageCategory::Melee, WeaponCategory::damage_category)
    }
}

/// Passive tree node tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeTier {
    Minor,
    Notable,
    Keystone,
}

/// An allocatable passive tree node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveNodeSpec {
    pub id: String,
    pub name: String,
    pub tier: NodeTier,
    pub required_level: u32,
    pub prerequisites: Vec<String>,
    pub modifiers: Vec<NodeModifier>,
}

/// Roll range of an affix at one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierRange {
    pub min: f64,
    pub max: f64,
}

/// An affix definition with its tiered roll ranges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffixSpec {
    pub kind: AffixKind,
    pub name: String,
    pub tiers: Vec<TierRange>,
}

impl AffixSpec {
    /// True when `value` could have been rolled at some tier.
    pub fn accepts(&self, value: f64) -> bool {
        self.tiers
            .iter()
            .any(|tier| value >= tier.min && value <= tier.max)
    }
}
