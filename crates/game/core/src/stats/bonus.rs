//! The aggregated passive bonus bundle.
//!
//! Each field follows one of three combination rules:
//! - **Additive** fields start at 0 and are summed
//! - **Multiplicative** fields start at 1.0 and are multiplied
//! - **Threshold** companions start unset and keep the most favourable value,
//!   with the configured default taking part in the comparison
//!
//! Because every field has a neutral starting value, bundles compose by plain
//! accumulation and an empty bundle changes nothing.

use strum::EnumCount;

use crate::config::EffectParams;
use crate::effects::{AdditiveStat, MultiplicativeStat, NodeModifier, ThresholdKind};

use super::WeaponCategory;

/// Aggregated passive bonuses for one combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusBundle {
    additive: [f64; AdditiveStat::COUNT],
    multiplicative: [f64; MultiplicativeStat::COUNT],
    weapon_damage: [f64; WeaponCategory::COUNT],
    block_cap_bonus: f64,
    cooldown_threshold: Option<f64>,
    min_cooldown: Option<f64>,
    low_hp_threshold: Option<f64>,
    execution_threshold: Option<f64>,
}

impl Default for BonusBundle {
    fn default() -> Self {
        Self::neutral()
    }
}

impl BonusBundle {
    /// A bundle that changes nothing.
    pub const fn neutral() -> Self {
        Self {
            additive: [0.0; AdditiveStat::COUNT],
            multiplicative: [1.0; MultiplicativeStat::COUNT],
            weapon_damage: [0.0; WeaponCategory::COUNT],
            block_cap_bonus: 0.0,
            cooldown_threshold: None,
            min_cooldown: None,
            low_hp_threshold: None,
            execution_threshold: None,
        }
    }

    /// Folds one modifier into the bundle.
    pub fn apply(&mut self, modifier: &NodeModifier) {
        match *modifier {
            NodeModifier::Add { stat, value } => self.additive[stat as usize] += value,
            NodeModifier::Multiply { stat, factor } => self.multiplicative[stat as usize] *= factor,
            NodeModifier::WeaponDamage { weapon, value } => {
                self.weapon_damage[weapon as usize] += value
            }
            NodeModifier::BlockCapBonus(value) => {
                self.block_cap_bonus = self.block_cap_bonus.max(value)
            }
            NodeModifier::Threshold { kind, value } => {
                let slot = match kind {
                    ThresholdKind::CooldownThreshold => &mut self.cooldown_threshold,
                    ThresholdKind::MinCooldown => &mut self.min_cooldown,
                    ThresholdKind::LowHpTaken => &mut self.low_hp_threshold,
                    ThresholdKind::Execution => &mut self.execution_threshold,
                };
                *slot = Some(match *slot {
                    None => value,
                    Some(current) if kind.prefers_lower() => current.min(value),
                    Some(current) => current.max(value),
                });
            }
        }
    }

    /// Sum of an additive field.
    pub fn additive(&self, stat: AdditiveStat) -> f64 {
        self.additive[stat as usize]
    }

    /// Additive field read as a whole number of rounds, stacks or charges.
    pub fn additive_count(&self, stat: AdditiveStat) -> u32 {
        self.additive(stat).max(0.0).round() as u32
    }

    /// Product of a multiplicative field.
    pub fn factor(&self, stat: MultiplicativeStat) -> f64 {
        self.multiplicative[stat as usize]
    }

    /// Weapon-scoped increased damage for `weapon`.
    pub fn weapon_damage(&self, weapon: WeaponCategory) -> f64 {
        self.weapon_damage[weapon as usize]
    }

    pub fn block_cap_bonus(&self) -> f64 {
        self.block_cap_bonus
    }

    pub fn cooldown_threshold(&self, defaults: &EffectParams) -> u32 {
        self.cooldown_threshold
            .map_or(defaults.cooldown_threshold, |value| {
                defaults.cooldown_threshold.min(value as u32)
            })
    }

    pub fn min_cooldown(&self, defaults: &EffectParams) -> u32 {
        self.min_cooldown
            .map_or(defaults.min_cooldown, |value| {
                defaults.min_cooldown.min(value as u32)
            })
    }

    pub fn low_hp_threshold(&self, defaults: &EffectParams) -> f64 {
        self.low_hp_threshold
            .map_or(defaults.low_hp_threshold, |value| {
                defaults.low_hp_threshold.max(value)
            })
    }

    pub fn execution_threshold(&self, defaults: &EffectParams) -> f64 {
        self.execution_threshold
            .map_or(defaults.execution_threshold, |value| {
                defaults.execution_threshold.max(value)
            })
    }

    /// Adds to an additive field directly; used for racial traits.
    pub fn add(&mut self, stat: AdditiveStat, value: f64) {
        self.additive[stat as usize] += value;
    }

    /// Cooldown after cooldown reduction.
    ///
    /// Only cooldowns at or above the threshold are reduced, and never below the floor.
    pub fn effective_cooldown(&self, base: u32, defaults: &EffectParams) -> u32 {
        let reduction = self.additive_count(AdditiveStat::CooldownReduction);
        if reduction == 0 || base < self.cooldown_threshold(defaults) {
            return base;
        }
        base.saturating_sub(reduction)
            .max(self.min_cooldown(defaults))
            .min(base)
    }
}
