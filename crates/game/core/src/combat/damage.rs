//! Damage categories, damage types and mitigation.

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Which damage figure an attack draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageCategory {
    Melee,
    Ranged,
    Spell,
}

/// Damage type for mitigation.
///
/// Physical damage is reduced by armor; every other type by the matching
/// resistance and can be absorbed by ward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    Physical,
    Fire,
    Cold,
    Lightning,
    Chaos,
}

impl DamageType {
    pub const fn is_physical(self) -> bool {
        matches!(self, Self::Physical)
    }
}

/// Armor after penetration. Penetration is clamped to `[0, 1]`.
pub fn effective_armor(armor: f64, penetration: f64) -> f64 {
    (armor * (1.0 - penetration.clamp(0.0, 1.0))).max(0.0)
}

/// Fraction of physical damage removed by `armor`.
///
/// # Formula
///
/// ```text
/// reduction = A / (A + K)
/// ```
///
/// Monotonic in `A` and strictly below 1 for any finite armor.
pub fn armor_reduction(armor: f64, armor_constant: f64) -> f64 {
    if armor <= 0.0 {
        return 0.0;
    }
    armor / (armor + armor_constant)
}

/// Damage left after mitigation.
pub fn mitigate(
    damage: f64,
    damage_type: DamageType,
    armor: f64,
    resistance: f64,
    armor_constant: f64,
) -> f64 {
    let factor = if damage_type.is_physical() {
        1.0 - armor_reduction(armor, armor_constant)
    } else {
        1.0 - resistance
    };
    (damage * factor).max(0.0)
}

/// Portion of `damage` a ward of size `ward` absorbs.
pub fn ward_absorption(ward: f64, damage: f64) -> f64 {
    ward.max(0.0).min(damage.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_reduction_is_monotonic_and_below_one() {
        let mut previous = armor_reduction(0.0, 100.0);
        assert_eq!(previous, 0.0);
        for armor in [1.0, 10.0, 100.0, 1_000.0, 1_000_000.0] {
            let reduction = armor_reduction(armor, 100.0);
            assert!(reduction > previous);
            assert!(reduction < 1.0);
            previous = reduction;
        }
    }

    #[test]
    fn penetration_lowers_armor() {
        assert_eq!(effective_armor(100.0, 0.4), 60.0);
        assert_eq!(effective_armor(100.0, 2.0), 0.0);
        assert_eq!(effective_armor(100.0, -1.0), 100.0);
    }

    #[test]
    fn resistances_mitigate_elemental_damage() {
        assert_eq!(mitigate(100.0, DamageType::Fire, 500.0, 0.25, 100.0), 75.0);
        assert_eq!(mitigate(100.0, DamageType::Physical, 100.0, 0.75, 100.0), 50.0);
        // negative resistance amplifies
        assert_eq!(mitigate(100.0, DamageType::Chaos, 0.0, -0.5, 100.0), 150.0);
    }

    #[test]
    fn ward_never_absorbs_more_than_it_has_or_the_hit() {
        assert_eq!(ward_absorption(30.0, 50.0), 30.0);
        assert_eq!(ward_absorption(80.0, 50.0), 50.0);
        assert_eq!(ward_absorption(0.0, 50.0), 0.0);
    }
}
