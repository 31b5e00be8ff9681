//! Equipped gear as seen by the stat compiler.

use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::combat::DamageCategory;

/// Weapon families. Weapon-scoped bonuses are bucketed by this.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponCategory {
    Bow,
    Dagger,
    OneHandSword,
    TwoHandSword,
    Wand,
    Staff,
}

impl WeaponCategory {
    /// Damage figure a basic attack with this weapon uses.
    pub const fn damage_category(self) -> DamageCategory {
        match self {
            Self::Bow => DamageCategory::Ranged,
            Self::Wand | Self::Staff => DamageCategory::Spell,
            Self::Dagger | Self::OneHandSword | Self::TwoHandSword => DamageCategory::Melee,
        }
    }

    /// Two-handed swords unlock the two-handed skill and buff bonuses.
    pub const fn is_two_handed_sword(self) -> bool {
        matches!(self, Self::TwoHandSword)
    }
}

/// Equipment slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    Weapon,
    Offhand,
    Armor,
    Belt,
}

/// Rolled affix kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AffixKind {
    DamagePct,
    AttackSpeedPct,
    CritChanceFlat,
    CritMultiFlat,
    MaxHpPct,
    MaxManaPct,
    ArmorPct,
    EvasionPct,
    WardPct,
    AccuracyPct,
    ArmorPenPct,
    BlockChanceFlat,
    InitiativeFlat,
    ResistFire,
    ResistCold,
    ResistLightning,
    ResistChaos,
    ResistAll,
    FlatFireDamage,
    FlatColdDamage,
    FlatLightningDamage,
    FlatChaosDamage,
}

/// An affix with its value already rolled.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RolledAffix {
    pub kind: AffixKind,
    pub value: f64,
}

impl RolledAffix {
    pub const fn new(kind: AffixKind, value: f64) -> Self {
        Self { kind, value }
    }
}

/// Base values printed on an item. Fields an item type does not use stay at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemBase {
    pub damage: f64,
    pub attack_speed: f64,
    pub armor: f64,
    pub evasion: f64,
    pub ward: f64,
    pub block_chance: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedItem {
    pub name: String,
    /// Set for weapons only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon: Option<WeaponCategory>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: ItemBase,
    #[cfg_attr(feature = "serde", serde(default))]
    pub affixes: Vec<RolledAffix>,
}

impl EquippedItem {
    pub fn affix_total(&self, kind: AffixKind) -> f64 {
        self.affixes
            .iter()
            .filter(|affix| affix.kind == kind)
            .map(|affix| affix.value)
            .sum()
    }
}

/// Four equipment slots; any may be empty.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Equipment {
    pub weapon: Option<EquippedItem>,
    pub offhand: Option<EquippedItem>,
    pub armor: Option<EquippedItem>,
    pub belt: Option<EquippedItem>,
}

impl Equipment {
    pub fn slot(&self, slot: Slot) -> Option<&EquippedItem> {
        match slot {
            Slot::Weapon => self.weapon.as_ref(),
            Slot::Offhand => self.offhand.as_ref(),
            Slot::Armor => self.armor.as_ref(),
            Slot::Belt => self.belt.as_ref(),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = (Slot, &EquippedItem)> {
        [Slot::Weapon, Slot::Offhand, Slot::Armor, Slot::Belt]
            .into_iter()
            .filter_map(|slot| self.slot(slot).map(|item| (slot, item)))
    }

    pub fn weapon_category(&self) -> Option<WeaponCategory> {
        self.weapon.as_ref().and_then(|item| item.weapon)
    }

    /// Base value read from one slot, zero when the slot is empty.
    pub fn base(&self, slot: Slot, value: impl Fn(&ItemBase) -> f64) -> f64 {
        self.slot(slot).map_or(0.0, |item| value(&item.base))
    }

    /// Sum of an affix over every equipped item.
    pub fn affix_total(&self, kind: AffixKind) -> f64 {
        self.items().map(|(_, item)| item.affix_total(kind)).sum()
    }

    /// Sum of an affix over the given slots only.
    pub fn affix_total_in(&self, slots: &[Slot], kind: AffixKind) -> f64 {
        self.items()
            .filter(|(slot, _)| slots.contains(slot))
            .map(|(_, item)| item.affix_total(kind))
            .sum()
    }

    /// Sum of an affix over every slot except the given ones.
    pub fn affix_total_outside(&self, slots: &[Slot], kind: AffixKind) -> f64 {
        self.items()
            .filter(|(slot, _)| !slots.contains(slot))
            .map(|(_, item)| item.affix_total(kind))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, affixes: Vec<RolledAffix>) -> EquippedItem {
        EquippedItem {
            name: name.to_owned(),
            weapon: None,
            base: ItemBase::default(),
            affixes,
        }
    }

    #[test]
    fn affix_totals_respect_slot_scope() {
        let equipment = Equipment {
            armor: Some(item("Plate", vec![RolledAffix::new(AffixKind::ArmorPct, 0.10)])),
            belt: Some(item(
                "Girdle",
                vec![
                    RolledAffix::new(AffixKind::ArmorPct, 0.05),
                    RolledAffix::new(AffixKind::ArmorPct, 0.05),
                ],
            )),
            ..Equipment::default()
        };

        assert!((equipment.affix_total(AffixKind::ArmorPct) - 0.20).abs() < 1e-12);
        assert!((equipment.affix_total_in(&[Slot::Armor], AffixKind::ArmorPct) - 0.10).abs() < 1e-12);
        assert!(
            (equipment.affix_total_outside(&[Slot::Armor], AffixKind::ArmorPct) - 0.10).abs() < 1e-12
        );
        assert_eq!(equipment.weapon_category(), None);
    }

    #[test]
    fn weapon_categories_map_to_damage_categories() {
        assert_eq!(WeaponCategory::Bow.damage_category(), DamageCategory::Ranged);
        assert_eq!(WeaponCategory::Staff.damage_category(), DamageCategory::Spell);
        assert_eq!(WeaponCategory::Dagger.damage_category(), DamageCategory::Melee);
        assert_eq!("TwoHandSword".parse::<WeaponCategory>(), Ok(WeaponCategory::TwoHandSword));
    }
}
