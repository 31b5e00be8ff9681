//! Typed effect specifications.
//!
//! These closed enums are the only effect representation the engine reads.
//! They are produced once, at content-load time, by [`super::parse`].

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::combat::StatusKind;
use crate::stats::WeaponCategory;

// ============================================================================
// Passive node modifiers
// ============================================================================

/// Bundle fields combined by summation (neutral value 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdditiveStat {
    MaxHpPercent,
    MaxManaPercent,
    InitiativeFlat,
    /// Global increased damage; weapon-scoped bonuses use [`NodeModifier::WeaponDamage`].
    IncreasedDamage,
    IncreasedAccuracy,
    CritChanceFlat,
    IncreasedArmor,
    IncreasedEvasion,
    IncreasedWard,
    IncreasedBlockChance,
    ArmorPenetration,
    ManaCostReduction,
    CooldownReduction,
    MarkDurationBonus,
    MarkEffectBonus,
    PoisonDurationBonus,
    BleedDurationBonus,
    BuffDurationBonus,
    ActiveSkillMultBonus,
    StunChanceBonus,
    LightningResistShredDurationBonus,
    ChargeBonus,
    AccuracyDebuffDurationBonus,
    BurnMaxStacksBonus,
    Lifesteal,
}

/// Bundle fields combined by product (neutral value 1.0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MultiplicativeStat {
    AccuracyMult,
    CritMultiplierMult,
    FirstSkillManaCostMult,
    FirstHitDamageTakenMult,
    LowHpDamageTakenMult,
    ExecutionWindowMult,
    DamageVsMarkedMult,
    FirstStrikeDamageMult,
    BlockSuccessDamageTakenMult,
    RiposteAfterBlockMult,
    StunDamageTakenMult,
    BurnTickMult,
}

/// Threshold companions; several nodes keep the most favourable value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdKind {
    /// Cooldowns at or above this are reduced. Lower is better.
    CooldownThreshold,
    /// Floor for reduced cooldowns. Lower is better.
    MinCooldown,
    /// HP ratio below which low-HP damage reduction applies. Higher is better.
    LowHpTaken,
    /// Target HP ratio below which the execution multiplier applies. Higher is better.
    Execution,
}

impl ThresholdKind {
    /// True when a smaller value is the more favourable one.
    pub const fn prefers_lower(self) -> bool {
        matches!(self, Self::CooldownThreshold | Self::MinCooldown)
    }
}

/// One parsed passive node modifier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeModifier {
    Add { stat: AdditiveStat, value: f64 },
    Multiply { stat: MultiplicativeStat, factor: f64 },
    WeaponDamage { weapon: WeaponCategory, value: f64 },
    /// Raises the block chance cap; the largest bonus wins.
    BlockCapBonus(f64),
    Threshold { kind: ThresholdKind, value: f64 },
}

// ============================================================================
// Skill effects
// ============================================================================

/// Parsed effect specification of a skill.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillEffectSpec {
    pub on_use: Vec<OnUseEffect>,
    pub on_hit: Vec<OnHitEffect>,
    pub multi_hit: Option<MultiHit>,
}

impl SkillEffectSpec {
    pub fn is_empty(&self) -> bool {
        self.on_use.is_empty() && self.on_hit.is_empty() && self.multi_hit.is_none()
    }

    /// Number of attack resolutions one cast performs.
    pub fn hits(&self) -> u32 {
        self.multi_hit.map_or(1, |multi| multi.hits)
    }

    /// Multiplier applied to each sub-hit.
    pub fn each_hit_multiplier(&self) -> f64 {
        self.multi_hit.map_or(1.0, |multi| multi.each_hit_multi)
    }

    /// Extra multiplier when the target is marked before the attack.
    pub fn marked_bonus(&self) -> Option<f64> {
        self.on_hit.iter().find_map(|effect| match effect {
            OnHitEffect::BonusDamageIfMarked(mult) => Some(*mult),
            _ => None,
        })
    }
}

/// Repeated sub-resolution within one action.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiHit {
    pub hits: u32,
    pub each_hit_multi: f64,
}

/// Gate on an on-use damage bonus.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UseCondition {
    ActingFirst,
    TargetHpBelow(f64),
}

/// Effects resolved when a skill is cast, before any attack.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OnUseEffect {
    CritBonus(f64),
    ArmorPenetration(f64),
    AccuracyMult(f64),
    CritMultiBonus { bonus: f64, cap: Option<f64> },
    DamageBonus {
        mult: f64,
        condition: Option<UseCondition>,
    },
    Stance(StanceSpec),
    Charges(ChargeSpec),
}

/// Timed self-buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StanceKind {
    SwordDance,
    CounterStance,
    ColossusStance,
    ShadowStep,
    HunterFocus,
}

impl StanceKind {
    pub const fn status(self) -> StatusKind {
        match self {
            Self::SwordDance => StatusKind::SwordDance,
            Self::CounterStance => StatusKind::CounterStance,
            Self::ColossusStance => StatusKind::ColossusStance,
            Self::ShadowStep => StatusKind::ShadowStep,
            Self::HunterFocus => StatusKind::HunterFocus,
        }
    }
}

/// Multipliers and flat bonuses a stance grants while active.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StanceBonuses {
    /// Evasion is multiplied by `1 + evasion_bonus`.
    pub evasion_bonus: f64,
    pub evasion_mult: f64,
    pub crit_bonus: f64,
    pub damage_mult: f64,
    pub armor_mult: f64,
    pub accuracy_mult: f64,
    /// Extra multiplier for the riposte armed by a successful block.
    pub riposte_bonus: f64,
}

impl Default for StanceBonuses {
    fn default() -> Self {
        Self {
            evasion_bonus: 0.0,
            evasion_mult: 1.0,
            crit_bonus: 0.0,
            damage_mult: 1.0,
            armor_mult: 1.0,
            accuracy_mult: 1.0,
            riposte_bonus: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StanceSpec {
    pub kind: StanceKind,
    pub duration: Option<u32>,
    pub bonuses: StanceBonuses,
}

/// Charge-based outgoing damage buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChargeKind {
    StaticCharge,
    AshArmor,
}

impl ChargeKind {
    pub const fn status(self) -> StatusKind {
        match self {
            Self::StaticCharge => StatusKind::StaticCharge,
            Self::AshArmor => StatusKind::AshArmor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChargeSpec {
    pub kind: ChargeKind,
    pub charges: Option<u32>,
    pub damage_mult: Option<f64>,
}

/// Damage-over-time kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DotKind {
    Bleed,
    Poison,
    Burn,
}

impl DotKind {
    pub const fn status(self) -> StatusKind {
        match self {
            Self::Bleed => StatusKind::Bleed,
            Self::Poison => StatusKind::Poison,
            Self::Burn => StatusKind::Burn,
        }
    }
}

/// Gate on an on-hit application.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitCondition {
    TargetHpBelow(f64),
}

/// Chance, duration and stacking shared by every on-hit application.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Application {
    pub chance: f64,
    pub duration: Option<u32>,
    pub max_stacks: u32,
    /// Stacks added per application.
    pub stacks: u32,
    pub refresh_duration: bool,
    pub condition: Option<HitCondition>,
}

impl Default for Application {
    fn default() -> Self {
        Self {
            chance: 1.0,
            duration: None,
            max_stacks: 1,
            stacks: 1,
            refresh_duration: true,
            condition: None,
        }
    }
}

/// Effects resolved after an attack lands.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OnHitEffect {
    Dot {
        kind: DotKind,
        apply: Application,
        /// Poison only: fraction of current HP per tick.
        tick_percent: Option<f64>,
    },
    Stun(Application),
    ArmorShred {
        apply: Application,
        fraction: Option<f64>,
    },
    Mark {
        apply: Application,
        damage_taken_mult: Option<f64>,
    },
    AshCloud {
        apply: Application,
        accuracy_mult: Option<f64>,
    },
    Paralyze {
        apply: Application,
        resist_reduction: Option<f64>,
    },
    /// Consumed by the orchestrator before resolution, not applied after the hit.
    BonusDamageIfMarked(f64),
}
