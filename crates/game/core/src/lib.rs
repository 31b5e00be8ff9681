//! Deterministic combat and stat-compilation engine.
//!
//! `arena-core` compiles character builds into [`CharacterSnapshot`]s and
//! plays matches between them. Every random sample is drawn through
//! [`CombatRng`], so a match seeded through [`SeededRolls`] replays exactly.
//! Content (races, skills, passive nodes) arrives already parsed through the
//! oracle traits and [`definitions`]; this crate performs no I/O.
pub mod combat;
pub mod config;
pub mod creature;
pub mod definitions;
pub mod effects;
pub mod env;
pub mod error;
pub mod stats;

pub use combat::{
    ActionStateError, CombatOrchestrator, Combatant, DamageCategory, DamageType, MatchOutcome,
    MatchResult, MatchSummary, PerSide, RoundRecord, Side, StatusKind, simulate_match,
};
pub use config::CombatConfig;
pub use creature::CreatureBlock;
pub use definitions::{AffixSpec, NodeTier, PassiveNodeSpec, SkillSpec, TierRange};
pub use effects::{EffectDiagnostic, NodeModifier, RawEffectMap, SkillEffectSpec};
pub use env::{
    CombatRng, FixedRolls, PcgRng, RaceDefinition, RaceKind, RaceOracle, RngOracle, RollKind,
    SeededRolls, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use stats::{
    Attributes, BonusAggregator, BonusBundle, BuildRequest, CharacterSnapshot, CompileError,
    Equipment, StatCompiler, WeaponCategory,
};

#[cfg(test)]
pub(crate) mod testing {
    use crate::combat::StatusEffects;
    use crate::env::RaceKind;
    use crate::stats::{
        Attributes, BonusBundle, CharacterSnapshot, DamageFigures, FlatElemental,
        IncreasedMultipliers, RacialTraits, Resistances, WeaponCategory,
    };

    /// A plain Human swordsman: 100 HP, 20 damage everywhere, 50 armor.
    pub fn snapshot() -> CharacterSnapshot {
        CharacterSnapshot {
            current_hp: 100.0,
            max_hp: 100.0,
            current_mana: 50.0,
            max_mana: 50.0,
            attributes: Attributes::default(),
            damage: DamageFigures {
                melee: 20.0,
                ranged: 20.0,
                spell: 20.0,
            },
            weapon: Some(WeaponCategory::OneHandSword),
            weapon_base_damage: 10.0,
            armor: 50.0,
            evasion: 0.0,
            ward: 0.0,
            accuracy: 100.0,
            crit_chance: 0.05,
            crit_chance_cap: 0.40,
            crit_multiplier: 1.5,
            crit_multiplier_cap: 2.5,
            block_chance: 0.0,
            block_chance_cap: 0.40,
            block_reduction: 0.35,
            resistances: Resistances::default(),
            resistance_range: (-0.5, 0.75),
            initiative: 10.0,
            increased: IncreasedMultipliers::default(),
            armor_penetration: 0.0,
            lifesteal: 0.0,
            flat_elemental: FlatElemental::default(),
            racial: RacialTraits::for_race(RaceKind::Human),
            bonuses: BonusBundle::neutral(),
            status: StatusEffects::new(),
        }
    }
}
