//! Generated PvE opponents.
//!
//! A creature's strength is a function of the encounter turn. Turns 1 to 3 are
//! a warm-up, turn 9 is a mid-run checkpoint and turn 15 the final fight.

use crate::combat::StatusEffects;
use crate::config::CombatConfig;
use crate::env::{CombatRng, RollKind};
use crate::stats::{
    Attributes, BonusBundle, CharacterSnapshot, DamageFigures, FlatElemental,
    IncreasedMultipliers, RacialTraits, Resistances,
};

/// Names by turn; later turns reuse the last one.
pub const CREATURE_NAMES: [&str; 10] = [
    "Goblin Raider",
    "Forest Wolf",
    "Bandit Scout",
    "Stone Golem",
    "Dark Cultist",
    "Orc Brute",
    "Shadow Wraith",
    "Iron Guardian",
    "Chaos Fiend",
    "Ancient Colossus",
];

/// Stat block of a generated creature.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureBlock {
    pub name: String,
    pub turn: u32,
    pub max_hp: f64,
    pub damage: f64,
    pub armor: f64,
    pub evasion: f64,
    pub accuracy: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub initiative: f64,
    pub resistances: Resistances,
}

impl CreatureBlock {
    /// Strength multiplier for an encounter turn.
    pub fn difficulty(turn: u32) -> f64 {
        match turn {
            0..=3 => 0.65,
            9 => 0.80,
            15 => 0.95,
            _ => 0.70,
        }
    }

    /// Generates the creature for `turn`.
    ///
    /// Draws one [`RollKind::Creature`] sample, shared by HP and damage.
    pub fn for_turn(turn: u32, rng: &mut impl CombatRng) -> Self {
        let t = f64::from(turn);
        let difficulty = Self::difficulty(turn);
        let variance = 0.9 + rng.sample(RollKind::Creature) * 0.2;
        let index = (turn.max(1) as usize - 1).min(CREATURE_NAMES.len() - 1);

        let block = Self {
            name: CREATURE_NAMES[index].to_owned(),
            turn,
            max_hp: ((60.0 + 15.0 * t) * difficulty * variance).round_ties_even(),
            damage: ((5.0 + 2.0 * t) * difficulty * variance).round_ties_even(),
            armor: ((10.0 + 3.0 * t) * difficulty).round_ties_even(),
            evasion: 1.5 * t,
            accuracy: 60.0 + 3.0 * t,
            crit_chance: 0.05,
            crit_multiplier: 1.5,
            initiative: 8.0 + t,
            resistances: Resistances::new(0.05, 0.05, 0.05, 0.0),
        };
        tracing::debug!(
            turn,
            name = %block.name,
            hp = block.max_hp,
            damage = block.damage,
            "creature generated"
        );
        block
    }

    /// Full-HP snapshot. Creatures carry no block, ward or mana and have no skill.
    pub fn into_snapshot(self, config: &CombatConfig) -> CharacterSnapshot {
        let caps = &config.caps;
        CharacterSnapshot {
            current_hp: self.max_hp,
            max_hp: self.max_hp,
            current_mana: 0.0,
            max_mana: 0.0,
            attributes: Attributes::uniform(0),
            damage: DamageFigures {
                melee: self.damage,
                ranged: self.damage,
                spell: self.damage,
            },
            weapon: None,
            weapon_base_damage: self.damage,
            armor: self.armor,
            evasion: self.evasion,
            ward: 0.0,
            accuracy: self.accuracy,
            crit_chance: self.crit_chance.min(caps.crit_chance_cap),
            crit_chance_cap: caps.crit_chance_cap,
            crit_multiplier: self.crit_multiplier,
            crit_multiplier_cap: caps.crit_multiplier_cap,
            block_chance: 0.0,
            block_chance_cap: caps.block_chance_cap,
            block_reduction: config.damage.block_reduction,
            resistances: self
                .resistances
                .clamped(caps.resistance_min, caps.resistance_max),
            resistance_range: (caps.resistance_min, caps.resistance_max),
            initiative: self.initiative,
            increased: IncreasedMultipliers::default(),
            armor_penetration: 0.0,
            lifesteal: 0.0,
            flat_elemental: FlatElemental::default(),
            racial: RacialTraits::default(),
            bonuses: BonusBundle::neutral(),
            status: StatusEffects::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedRolls;

    #[test]
    fn difficulty_curve() {
        assert_eq!(CreatureBlock::difficulty(1), 0.65);
        assert_eq!(CreatureBlock::difficulty(3), 0.65);
        assert_eq!(CreatureBlock::difficulty(4), 0.70);
        assert_eq!(CreatureBlock::difficulty(9), 0.80);
        assert_eq!(CreatureBlock::difficulty(15), 0.95);
        assert_eq!(CreatureBlock::difficulty(20), 0.70);
    }

    #[test]
    fn turn_one_creature() {
        // sample 0.5 gives variance 1.0
        let block = CreatureBlock::for_turn(1, &mut FixedRolls::uniform(0.5));
        assert_eq!(block.name, "Goblin Raider");
        // 75 * 0.65 = 48.75
        assert_eq!(block.max_hp, 49.0);
        // 7 * 0.65 = 4.55
        assert_eq!(block.damage, 5.0);
        // 13 * 0.65 = 8.45
        assert_eq!(block.armor, 8.0);
        assert_eq!(block.accuracy, 63.0);
        assert_eq!(block.initiative, 9.0);
    }

    #[test]
    fn names_stop_at_the_last_entry() {
        let mut rolls = FixedRolls::uniform(0.5);
        assert_eq!(CreatureBlock::for_turn(10, &mut rolls).name, "Ancient Colossus");
        assert_eq!(CreatureBlock::for_turn(15, &mut rolls).name, "Ancient Colossus");
    }

    #[test]
    fn snapshot_has_no_block_or_ward() {
        let config = CombatConfig::default();
        let snapshot =
            CreatureBlock::for_turn(9, &mut FixedRolls::uniform(0.0)).into_snapshot(&config);
        assert_eq!(snapshot.current_hp, snapshot.max_hp);
        assert_eq!(snapshot.block_chance, 0.0);
        assert_eq!(snapshot.ward, 0.0);
        assert_eq!(snapshot.resistances.chaos, 0.0);
        assert!(snapshot.bonuses == BonusBundle::neutral());
        assert!(snapshot.is_alive());
    }
}
