//! Status effects carried by a combatant during a match.
//!
//! Each combatant holds at most one live effect per [`StatusKind`].
//! Re-application stacks (up to the cap) and refreshes the duration instead of
//! adding a second instance, which is what lets the list live in a fixed-size
//! [`ArrayVec`].
//!
//! # Durations
//!
//! Durations are counted in rounds and decremented by the round tick, except
//! for two families:
//!
//! - **Stun** counts the stunned side's skipped turns and is decremented by
//!   the orchestrator at the end of each skipped turn.
//! - **Charge buffs** never expire by time; they are removed when their last
//!   charge is spent.

use arrayvec::ArrayVec;
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::config::CombatConfig;

use super::DamageType;

/// Types of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Bleed,
    Poison,
    Burn,

    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Skips the owner's turns.
    Stun,
    /// Increases damage taken.
    Mark,
    ArmorShred,
    /// Lowers accuracy.
    AshCloud,
    /// Lowers lightning resistance.
    Paralyze,

    // ========================================================================
    // Charge buffs
    // ========================================================================
    StaticCharge,
    AshArmor,

    // ========================================================================
    // Stances
    // ========================================================================
    SwordDance,
    CounterStance,
    ColossusStance,
    ShadowStep,
    HunterFocus,
}

impl StatusKind {
    pub const fn is_dot(self) -> bool {
        matches!(self, Self::Bleed | Self::Poison | Self::Burn)
    }

    /// Harmful effects placed by the opponent.
    pub const fn is_debuff(self) -> bool {
        matches!(
            self,
            Self::Bleed
                | Self::Poison
                | Self::Burn
                | Self::Stun
                | Self::Mark
                | Self::ArmorShred
                | Self::AshCloud
                | Self::Paralyze
        )
    }

    pub const fn is_charge_buff(self) -> bool {
        matches!(self, Self::StaticCharge | Self::AshArmor)
    }

    /// True when the round tick decrements this effect.
    pub const fn ticks_by_round(self) -> bool {
        !matches!(self, Self::Stun | Self::StaticCharge | Self::AshArmor)
    }
}

/// Per-stack damage of a DOT tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DotTick {
    #[default]
    None,
    /// Fixed amount, fixed when applied.
    Flat(f64),
    /// Fraction of the owner's current HP at tick time.
    PercentOfCurrentHp(f64),
}

impl DotTick {
    /// Damage of one stack given the owner's current HP.
    pub fn per_stack(&self, current_hp: f64) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::Flat(amount) => amount,
            Self::PercentOfCurrentHp(ratio) => current_hp.max(0.0) * ratio,
        }
    }
}

/// Stat deltas applied to the owner while an effect is live.
///
/// Additive fields are deltas; `damage_mult` scales every damage figure.
/// Recorded so the exact change can be reverted on removal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatShift {
    pub armor: f64,
    pub evasion: f64,
    pub accuracy: f64,
    pub crit_chance: f64,
    pub lightning_resist: f64,
    pub damage_mult: f64,
}

impl Default for StatShift {
    fn default() -> Self {
        Self {
            armor: 0.0,
            evasion: 0.0,
            accuracy: 0.0,
            crit_chance: 0.0,
            lightning_resist: 0.0,
            damage_mult: 1.0,
        }
    }
}

impl StatShift {
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Effect-specific values.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusPayload {
    /// Damage taken multiplier (Mark).
    pub damage_taken_mult: f64,
    /// Outgoing damage multiplier per charge (charge buffs).
    pub damage_mult: f64,
    pub charges: Option<u32>,
    /// Riposte multiplier bonus (CounterStance).
    pub riposte_bonus: f64,
    pub shift: StatShift,
}

impl Default for StatusPayload {
    fn default() -> Self {
        Self {
            damage_taken_mult: 1.0,
            damage_mult: 1.0,
            charges: None,
            riposte_bonus: 0.0,
            shift: StatShift::default(),
        }
    }
}

/// A live status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStatusEffect {
    pub kind: StatusKind,
    pub remaining_rounds: u32,
    pub stacks: u32,
    pub max_stacks: u32,
    /// Ceiling for `remaining_rounds` when the effect is refreshed.
    pub max_duration: u32,
    pub tick: DotTick,
    /// Resistance that mitigates the tick, if any.
    pub resisted_by: Option<DamageType>,
    /// Ward absorbs the tick before HP.
    pub ward_absorbs: bool,
    pub payload: StatusPayload,
}

impl ActiveStatusEffect {
    /// An effect with a single stack that lasts `duration` rounds.
    pub fn new(kind: StatusKind, duration: u32) -> Self {
        Self {
            kind,
            remaining_rounds: duration,
            stacks: 1,
            max_stacks: 1,
            max_duration: duration,
            tick: DotTick::None,
            resisted_by: None,
            ward_absorbs: false,
            payload: StatusPayload::default(),
        }
    }

    #[must_use]
    pub fn with_stacks(mut self, stacks: u32, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks.max(1);
        self.stacks = stacks.clamp(1, self.max_stacks);
        self
    }

    #[must_use]
    pub fn with_tick(mut self, tick: DotTick) -> Self {
        self.tick = tick;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: StatusPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Raw tick damage before resistance and ward.
    pub fn tick_damage(&self, current_hp: f64) -> f64 {
        self.tick.per_stack(current_hp) * f64::from(self.stacks)
    }
}

/// Result of [`StatusEffects::apply`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Applied {
    /// No instance existed; the caller owns applying the new effect's shift.
    New,
    /// An existing instance was stacked and refreshed; its shift is unchanged.
    Refreshed { stacks: u32, remaining_rounds: u32 },
}

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<ActiveStatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&ActiveStatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn get_mut(&mut self, kind: StatusKind) -> Option<&mut ActiveStatusEffect> {
        self.effects.iter_mut().find(|e| e.kind == kind)
    }

    /// Adds an effect, or stacks and refreshes the live instance of its kind.
    ///
    /// Stacks never exceed the max stacks, and a refreshed duration never
    /// exceeds the max duration.
    pub fn apply(&mut self, effect: ActiveStatusEffect) -> Applied {
        if let Some(existing) = self.get_mut(effect.kind) {
            existing.max_stacks = existing.max_stacks.max(effect.max_stacks);
            existing.stacks = (existing.stacks + effect.stacks).min(existing.max_stacks);
            existing.max_duration = effect.max_duration;
            existing.remaining_rounds = effect.remaining_rounds.min(existing.max_duration);
            existing.tick = effect.tick;
            existing.payload.damage_taken_mult = effect.payload.damage_taken_mult;
            existing.payload.damage_mult = effect.payload.damage_mult;
            existing.payload.charges = effect.payload.charges;
            return Applied::Refreshed {
                stacks: existing.stacks,
                remaining_rounds: existing.remaining_rounds,
            };
        }

        // One slot per kind, so this only fails if that invariant is broken.
        if !self.effects.is_full() {
            self.effects.push(effect);
        }
        Applied::New
    }

    /// Removes an effect immediately, returning it so its shift can be reverted.
    pub fn remove(&mut self, kind: StatusKind) -> Option<ActiveStatusEffect> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatusEffect> {
        self.effects.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActiveStatusEffect> {
        self.effects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Damage-taken multiplier from Mark, 1.0 when unmarked.
    pub fn mark_multiplier(&self) -> f64 {
        self.get(StatusKind::Mark)
            .map_or(1.0, |mark| mark.payload.damage_taken_mult)
    }

    /// Stun turns left, zero when not stunned.
    pub fn stun_turns(&self) -> u32 {
        self.get(StatusKind::Stun)
            .map_or(0, |stun| stun.remaining_rounds)
    }
}
