//! Combat configuration constants and tunable parameters.

use strum::EnumCount;

use crate::combat::StatusKind;

/// Tunable balance parameters for stat compilation and combat.
///
/// Every field has a sensible default so partial TOML files only need to
/// list the values they change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub rounds: RoundParams,
    pub hit: HitParams,
    pub damage: DamageParams,
    pub caps: CapParams,
    pub attributes: AttributeParams,
    pub effects: EffectParams,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// One live status slot per kind.
    pub const MAX_STATUS_EFFECTS: usize = StatusKind::COUNT;
    /// Upper bound on sub-hits a single multi-hit skill may declare.
    pub const MAX_SUB_HITS: u32 = 8;

    pub fn new() -> Self {
        Self {
            rounds: RoundParams::default(),
            hit: HitParams::default(),
            damage: DamageParams::default(),
            caps: CapParams::default(),
            attributes: AttributeParams::default(),
            effects: EffectParams::default(),
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Round limits and sudden death escalation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoundParams {
    /// Last round in which normal actions happen.
    pub normal_limit: u32,
    /// Absolute cap; reaching it ends the match as a timeout.
    pub absolute_cap: u32,
    /// Fraction of max HP dealt per sudden death stack.
    pub sudden_death_ratio: f64,
}

impl Default for RoundParams {
    fn default() -> Self {
        Self {
            normal_limit: 15,
            absolute_cap: 50,
            sudden_death_ratio: 0.05,
        }
    }
}

/// Hit chance band.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitParams {
    pub min_chance: f64,
    pub max_chance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            min_chance: 0.05,
            max_chance: 0.95,
        }
    }
}

/// Damage roll and mitigation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageParams {
    /// Symmetric variance applied to every damage roll (0.10 = ±10%).
    pub variance: f64,
    /// Armor constant `K` in `armor / (armor + K)`.
    pub armor_constant: f64,
    /// Damage used when no weapon is equipped.
    pub bare_hand_damage: f64,
    /// Attack speed used when no weapon is equipped.
    pub bare_hand_speed: f64,
    /// Fraction of blocked damage that is removed.
    pub block_reduction: f64,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            variance: 0.10,
            armor_constant: 100.0,
            bare_hand_damage: 5.0,
            bare_hand_speed: 5.0,
            block_reduction: 0.35,
        }
    }
}

/// Caps and clamps applied during stat compilation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CapParams {
    pub base_crit_chance: f64,
    pub crit_chance_cap: f64,
    pub base_crit_multiplier: f64,
    pub crit_multiplier_cap: f64,
    pub block_chance_cap: f64,
    pub resistance_min: f64,
    pub resistance_max: f64,
}

impl Default for CapParams {
    fn default() -> Self {
        Self {
            base_crit_chance: 0.05,
            crit_chance_cap: 0.40,
            base_crit_multiplier: 1.5,
            crit_multiplier_cap: 2.5,
            block_chance_cap: 0.40,
            resistance_min: -0.50,
            resistance_max: 0.75,
        }
    }
}

/// Attribute scaling used by the stat compiler.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttributeParams {
    /// Multiplier applied to every attribute while wounded.
    pub wound_multiplier: f64,
    pub hp_per_strength: f64,
    pub hp_per_vitality: f64,
    pub mana_per_intelligence: f64,
    pub mana_per_wisdom: f64,
    /// Damage per point of the category's primary attribute.
    pub damage_per_point: f64,
    /// Vitality, agility and wisdom points up to this value give no armor, evasion or ward.
    pub defence_attribute_floor: i32,
    pub armor_per_vitality: f64,
    pub evasion_per_agility: f64,
    pub ward_per_wisdom: f64,
    pub base_accuracy: f64,
    pub accuracy_per_dexterity: f64,
    pub crit_per_dexterity: f64,
    pub block_per_vitality: f64,
    pub initiative_per_agility: f64,
}

impl Default for AttributeParams {
    fn default() -> Self {
        Self {
            wound_multiplier: 0.97,
            hp_per_strength: 2.0,
            hp_per_vitality: 4.0,
            mana_per_intelligence: 2.0,
            mana_per_wisdom: 4.0,
            damage_per_point: 2.0,
            defence_attribute_floor: 5,
            armor_per_vitality: 2.0,
            evasion_per_agility: 2.0,
            ward_per_wisdom: 2.0,
            base_accuracy: 100.0,
            accuracy_per_dexterity: 2.0,
            crit_per_dexterity: 0.002,
            block_per_vitality: 0.002,
            initiative_per_agility: 2.0,
        }
    }
}

/// Status effect defaults, used when an effect spec omits a value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectParams {
    pub bleed_tick_ratio: f64,
    pub poison_tick_percent: f64,
    pub burn_tick_percent: f64,
    pub armor_shred_fraction: f64,
    pub mark_damage_taken: f64,
    pub ash_cloud_accuracy: f64,
    pub paralyze_resist_shred: f64,
    /// Default duration of DOTs and stat debuffs.
    pub debuff_duration: u32,
    pub stun_duration: u32,
    pub mark_duration: u32,
    pub buff_duration: u32,
    pub charges: u32,
    pub charge_damage_mult: f64,
    /// Cooldowns at or above this value are reduced by cooldown reduction.
    pub cooldown_threshold: u32,
    /// Cooldown reduction never brings a cooldown below this.
    pub min_cooldown: u32,
    pub low_hp_threshold: f64,
    pub execution_threshold: f64,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            bleed_tick_ratio: 0.25,
            poison_tick_percent: 0.04,
            burn_tick_percent: 0.03,
            armor_shred_fraction: 0.15,
            mark_damage_taken: 1.12,
            ash_cloud_accuracy: 0.85,
            paralyze_resist_shred: 0.20,
            debuff_duration: 2,
            stun_duration: 1,
            mark_duration: 3,
            buff_duration: 2,
            charges: 3,
            charge_damage_mult: 1.2,
            cooldown_threshold: 3,
            min_cooldown: 2,
            low_hp_threshold: 0.25,
            execution_threshold: 0.35,
        }
    }
}
