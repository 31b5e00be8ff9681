//! Racial passive traits applied at the end of stat compilation.

use bitflags::bitflags;

use crate::config::CombatConfig;
use crate::env::RaceKind;

use super::CharacterSnapshot;

bitflags! {
    /// Racial trait flags carried into combat.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct RacialFlags: u8 {
        /// Attributes ignore the wound penalty.
        const WOUND_IMMUNE = 1 << 0;
        /// Drakoid marker; informational only.
        const DRACONIC_CORE = 1 << 1;
        /// Orc damage bonus after a PvP victory is active.
        const BLOODLUST = 1 << 2;
    }
}

/// Racial traits of one combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RacialTraits {
    pub race: Option<RaceKind>,
    pub flags: RacialFlags,
    /// Rounds shaved off every debuff landing on this combatant (minimum 1 remains).
    pub debuff_duration_reduction: u32,
}

impl RacialTraits {
    const DWARF_ARMOR_MULT: f64 = 1.05;
    const ORC_LIFESTEAL: f64 = 0.01;
    const ORC_BLOODLUST_DAMAGE: f64 = 0.15;
    const UNDEAD_CHAOS_RESIST: f64 = 0.15;
    const DRAKOID_RESIST_ALL: f64 = 0.05;

    /// Trait set of `race` before any match context is known.
    pub fn for_race(race: RaceKind) -> Self {
        let (flags, debuff_duration_reduction) = match race {
            RaceKind::Human | RaceKind::Orc => (RacialFlags::empty(), 0),
            RaceKind::Dwarf => (RacialFlags::empty(), 1),
            RaceKind::Undead => (RacialFlags::WOUND_IMMUNE, 0),
            RaceKind::Drakoid => (RacialFlags::DRACONIC_CORE, 0),
        };
        Self {
            race: Some(race),
            flags,
            debuff_duration_reduction,
        }
    }

    pub fn is_wound_immune(&self) -> bool {
        self.flags.contains(RacialFlags::WOUND_IMMUNE)
    }

    /// Shortens a debuff duration, never below one round.
    pub fn reduce_debuff(&self, duration: u32) -> u32 {
        if self.debuff_duration_reduction == 0 {
            return duration;
        }
        duration
            .saturating_sub(self.debuff_duration_reduction)
            .max(1)
    }

    /// Applies the racial stat adjustments to a compiled snapshot.
    ///
    /// Returns the increase to apply to the damage multiplier (Orc bloodlust),
    /// which the caller folds in with a damage recompute.
    pub(crate) fn apply(
        &mut self,
        snapshot: &mut CharacterSnapshot,
        last_win_was_pvp: bool,
        config: &CombatConfig,
    ) -> f64 {
        let (min, max) = (config.caps.resistance_min, config.caps.resistance_max);
        match self.race {
            Some(RaceKind::Dwarf) => {
                snapshot.armor *= Self::DWARF_ARMOR_MULT;
                0.0
            }
            Some(RaceKind::Orc) => {
                snapshot.lifesteal += Self::ORC_LIFESTEAL;
                if last_win_was_pvp {
                    self.flags.insert(RacialFlags::BLOODLUST);
                    Self::ORC_BLOODLUST_DAMAGE
                } else {
                    0.0
                }
            }
            Some(RaceKind::Undead) => {
                snapshot.resistances.chaos =
                    (snapshot.resistances.chaos + Self::UNDEAD_CHAOS_RESIST).clamp(min, max);
                0.0
            }
            Some(RaceKind::Drakoid) => {
                let r = &mut snapshot.resistances;
                r.fire += Self::DRAKOID_RESIST_ALL;
                r.cold += Self::DRAKOID_RESIST_ALL;
                r.lightning += Self::DRAKOID_RESIST_ALL;
                r.chaos += Self::DRAKOID_RESIST_ALL;
                snapshot.resistances = snapshot.resistances.clamped(min, max);
                0.0
            }
            Some(RaceKind::Human) | None => 0.0,
        }
    }
}
