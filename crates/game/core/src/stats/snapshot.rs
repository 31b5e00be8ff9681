//! Compiled, round-ready combat statistics.

use crate::combat::{DamageCategory, DamageType, StatShift, StatusEffects};

use super::{Attributes, BonusBundle, RacialTraits, WeaponCategory};

/// Elemental resistances as fractions (0.25 = 25% less damage taken).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Resistances {
    pub fire: f64,
    pub cold: f64,
    pub lightning: f64,
    pub chaos: f64,
}

impl Resistances {
    pub const fn new(fire: f64, cold: f64, lightning: f64, chaos: f64) -> Self {
        Self {
            fire,
            cold,
            lightning,
            chaos,
        }
    }

    /// Resistance against `damage_type`. Physical damage is mitigated by armor instead.
    pub fn get(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Physical => 0.0,
            DamageType::Fire => self.fire,
            DamageType::Cold => self.cold,
            DamageType::Lightning => self.lightning,
            DamageType::Chaos => self.chaos,
        }
    }

    pub fn get_mut(&mut self, damage_type: DamageType) -> Option<&mut f64> {
        match damage_type {
            DamageType::Physical => None,
            DamageType::Fire => Some(&mut self.fire),
            DamageType::Cold => Some(&mut self.cold),
            DamageType::Lightning => Some(&mut self.lightning),
            DamageType::Chaos => Some(&mut self.chaos),
        }
    }

    pub fn clamped(self, min: f64, max: f64) -> Self {
        Self {
            fire: self.fire.clamp(min, max),
            cold: self.cold.clamp(min, max),
            lightning: self.lightning.clamp(min, max),
            chaos: self.chaos.clamp(min, max),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> {
        [self.fire, self.cold, self.lightning, self.chaos].into_iter()
    }
}

/// Damage per category before skill multipliers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageFigures {
    pub melee: f64,
    pub ranged: f64,
    pub spell: f64,
}

impl DamageFigures {
    pub fn get(&self, category: DamageCategory) -> f64 {
        match category {
            DamageCategory::Melee => self.melee,
            DamageCategory::Ranged => self.ranged,
            DamageCategory::Spell => self.spell,
        }
    }

    pub fn scale(&mut self, factor: f64) {
        self.melee *= factor;
        self.ranged *= factor;
        self.spell *= factor;
    }
}

/// "Increased X" multipliers; 1.0 is neutral.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncreasedMultipliers {
    pub damage: f64,
    pub armor: f64,
    pub evasion: f64,
    pub ward: f64,
    pub accuracy: f64,
    pub crit_chance: f64,
    pub block_chance: f64,
}

impl Default for IncreasedMultipliers {
    fn default() -> Self {
        Self {
            damage: 1.0,
            armor: 1.0,
            evasion: 1.0,
            ward: 1.0,
            accuracy: 1.0,
            crit_chance: 1.0,
            block_chance: 1.0,
        }
    }
}

/// Flat elemental damage added to every landed hit as a separate resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatElemental {
    pub fire: f64,
    pub cold: f64,
    pub lightning: f64,
    pub chaos: f64,
}

impl FlatElemental {
    pub fn iter(&self) -> impl Iterator<Item = (DamageType, f64)> {
        [
            (DamageType::Fire, self.fire),
            (DamageType::Cold, self.cold),
            (DamageType::Lightning, self.lightning),
            (DamageType::Chaos, self.chaos),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Fully compiled, mutable combat statistics for one combatant.
///
/// Created once per combatant per match. The orchestrator owns and mutates it
/// every round; a rematch must start from a clone, never an alias.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSnapshot {
    pub current_hp: f64,
    pub max_hp: f64,
    pub current_mana: f64,
    pub max_mana: f64,
    pub attributes: Attributes,
    pub damage: DamageFigures,
    pub weapon: Option<WeaponCategory>,
    /// Weapon base damage (bare-hand value without a weapon); bleed ticks scale from it.
    pub weapon_base_damage: f64,
    pub armor: f64,
    pub evasion: f64,
    pub ward: f64,
    pub accuracy: f64,
    pub crit_chance: f64,
    pub crit_chance_cap: f64,
    pub crit_multiplier: f64,
    pub crit_multiplier_cap: f64,
    pub block_chance: f64,
    pub block_chance_cap: f64,
    pub block_reduction: f64,
    pub resistances: Resistances,
    pub resistance_range: (f64, f64),
    pub initiative: f64,
    pub increased: IncreasedMultipliers,
    pub armor_penetration: f64,
    pub lifesteal: f64,
    pub flat_elemental: FlatElemental,
    pub racial: RacialTraits,
    pub bonuses: BonusBundle,
    pub status: StatusEffects,
}

impl CharacterSnapshot {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }

    /// Current HP as a fraction of max HP.
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            self.current_hp / self.max_hp
        }
    }

    pub fn damage_for(&self, category: DamageCategory) -> f64 {
        self.damage.get(category)
    }

    pub fn resistance(&self, damage_type: DamageType) -> f64 {
        self.resistances.get(damage_type)
    }

    pub fn wields_two_handed_sword(&self) -> bool {
        self.weapon
            .is_some_and(WeaponCategory::is_two_handed_sword)
    }

    /// Removes HP, never below zero. Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: f64) -> f64 {
        let removed = amount.max(0.0).min(self.current_hp.max(0.0));
        self.current_hp = (self.current_hp - amount.max(0.0)).max(0.0);
        removed
    }

    /// Restores HP up to max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount.max(0.0)).min(self.max_hp);
        self.current_hp - before
    }

    /// Consumes ward for an already computed absorption.
    pub fn consume_ward(&mut self, absorbed: f64) {
        self.ward = (self.ward - absorbed.max(0.0)).max(0.0);
    }

    /// Applies a status effect's stat deltas.
    pub fn apply_shift(&mut self, shift: &StatShift) {
        self.armor = (self.armor + shift.armor).max(0.0);
        self.evasion = (self.evasion + shift.evasion).max(0.0);
        self.accuracy = (self.accuracy + shift.accuracy).max(0.0);
        self.crit_chance += shift.crit_chance;
        self.resistances.lightning += shift.lightning_resist;
        if shift.damage_mult != 1.0 && shift.damage_mult > 0.0 {
            self.damage.scale(shift.damage_mult);
        }
    }

    /// Undoes [`Self::apply_shift`].
    pub fn revert_shift(&mut self, shift: &StatShift) {
        self.armor = (self.armor - shift.armor).max(0.0);
        self.evasion = (self.evasion - shift.evasion).max(0.0);
        self.accuracy = (self.accuracy - shift.accuracy).max(0.0);
        self.crit_chance = (self.crit_chance - shift.crit_chance).clamp(0.0, self.crit_chance_cap);
        let (min, max) = self.resistance_range;
        self.resistances.lightning = (self.resistances.lightning - shift.lightning_resist).clamp(min, max);
        if shift.damage_mult != 1.0 && shift.damage_mult > 0.0 {
            self.damage.scale(1.0 / shift.damage_mult);
        }
    }
}
