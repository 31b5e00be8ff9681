//! Applying skill effects and ticking status effects.
//!
//! Every entry point returns a report describing what happened instead of
//! writing through out-parameters; the orchestrator turns reports into
//! round records.

use crate::config::CombatConfig;
use crate::effects::{
    AdditiveStat, Application, ChargeSpec, DotKind, HitCondition, MultiplicativeStat, OnHitEffect,
    OnUseEffect, StanceSpec, UseCondition,
};
use crate::env::{CombatRng, RollKind};
use crate::stats::CharacterSnapshot;

use super::status::{
    ActiveStatusEffect, Applied, DotTick, StatShift, StatusKind, StatusPayload,
};
use super::DamageType;

/// Context of the action an on-use effect belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UseContext {
    /// The caster moves first this round.
    pub acting_first: bool,
}

/// Per-action modifiers produced by on-use effects.
///
/// These apply to the attack resolutions of the same action only.
#[derive(Clone, Debug, PartialEq)]
pub struct UseReport {
    pub crit_bonus: f64,
    pub armor_penetration: f64,
    pub accuracy_mult: f64,
    pub damage_mult: f64,
    pub crit_multi_bonus: f64,
    pub crit_multi_cap: Option<f64>,
    pub applied: Vec<StatusKind>,
    pub events: Vec<String>,
}

impl Default for UseReport {
    fn default() -> Self {
        Self {
            crit_bonus: 0.0,
            armor_penetration: 0.0,
            accuracy_mult: 1.0,
            damage_mult: 1.0,
            crit_multi_bonus: 0.0,
            crit_multi_cap: None,
            applied: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// Status effects placed by a landed hit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HitEffectReport {
    pub applied: Vec<StatusKind>,
    pub events: Vec<String>,
}

/// Result of one round tick on one combatant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// DOT damage to subtract from HP.
    pub damage: f64,
    /// DOT damage the ward absorbed (already removed from the ward).
    pub ward_absorbed: f64,
    pub expired: Vec<StatusKind>,
    pub events: Vec<String>,
}

/// Resolves on-use effects for a cast.
///
/// Stances and charge buffs are applied to `caster` immediately; the
/// remaining effects only modify this action and are returned in the report.
pub fn apply_on_use(
    caster: &mut CharacterSnapshot,
    target: &CharacterSnapshot,
    effects: &[OnUseEffect],
    context: UseContext,
    config: &CombatConfig,
) -> UseReport {
    let mut report = UseReport::default();

    for effect in effects {
        match *effect {
            OnUseEffect::CritBonus(bonus) => report.crit_bonus += bonus,
            OnUseEffect::ArmorPenetration(pen) => report.armor_penetration += pen,
            OnUseEffect::AccuracyMult(mult) => report.accuracy_mult *= mult,
            OnUseEffect::CritMultiBonus { bonus, cap } => {
                report.crit_multi_bonus += bonus;
                if let Some(cap) = cap {
                    report.crit_multi_cap = Some(report.crit_multi_cap.map_or(cap, |c| c.max(cap)));
                }
            }
            OnUseEffect::DamageBonus { mult, condition } => {
                let met = match condition {
                    None => true,
                    Some(UseCondition::ActingFirst) => context.acting_first,
                    Some(UseCondition::TargetHpBelow(threshold)) => target.hp_ratio() < threshold,
                };
                if met {
                    report.damage_mult *= mult;
                    report.events.push(format!("Damage bonus ×{mult:.2}"));
                }
            }
            OnUseEffect::Stance(stance) => {
                apply_stance(caster, &stance, config, &mut report);
            }
            OnUseEffect::Charges(charges) => {
                apply_charges(caster, &charges, config, &mut report);
            }
        }
    }

    report
}

fn apply_stance(
    caster: &mut CharacterSnapshot,
    stance: &StanceSpec,
    config: &CombatConfig,
    report: &mut UseReport,
) {
    let kind = stance.kind.status();
    // Re-casting replaces the live stance so its deltas are measured fresh.
    if let Some(previous) = caster.status.remove(kind) {
        caster.revert_shift(&previous.payload.shift);
    }

    let mut duration = stance.duration.unwrap_or(config.effects.buff_duration);
    if caster.wields_two_handed_sword() {
        duration += caster.bonuses.additive_count(AdditiveStat::BuffDurationBonus);
    }

    let bonuses = &stance.bonuses;
    let boosted_evasion = caster.evasion * (1.0 + bonuses.evasion_bonus) * bonuses.evasion_mult;
    let boosted_crit = (caster.crit_chance + bonuses.crit_bonus).min(caster.crit_chance_cap);
    let shift = StatShift {
        armor: caster.armor * (bonuses.armor_mult - 1.0),
        evasion: boosted_evasion - caster.evasion,
        accuracy: caster.accuracy * (bonuses.accuracy_mult - 1.0),
        crit_chance: boosted_crit - caster.crit_chance,
        lightning_resist: 0.0,
        damage_mult: bonuses.damage_mult,
    };
    caster.apply_shift(&shift);

    let effect = ActiveStatusEffect::new(kind, duration).with_payload(StatusPayload {
        riposte_bonus: bonuses.riposte_bonus,
        shift,
        ..StatusPayload::default()
    });
    caster.status.apply(effect);

    report.applied.push(kind);
    report.events.push(format!("{kind} active for {duration} rounds"));
}

fn apply_charges(
    caster: &mut CharacterSnapshot,
    spec: &ChargeSpec,
    config: &CombatConfig,
    report: &mut UseReport,
) {
    let kind = spec.kind.status();
    let charges = spec.charges.unwrap_or(config.effects.charges)
        + caster.bonuses.additive_count(AdditiveStat::ChargeBonus);
    let damage_mult = spec.damage_mult.unwrap_or(config.effects.charge_damage_mult);

    let effect = ActiveStatusEffect::new(kind, 0).with_payload(StatusPayload {
        damage_mult,
        charges: Some(charges),
        ..StatusPayload::default()
    });
    caster.status.apply(effect);

    report.applied.push(kind);
    report
        .events
        .push(format!("{kind} charged ({charges} × {damage_mult:.2})"));
}

/// Applies on-hit effects of a landed hit to `target`.
///
/// Each effect rolls its own chance once. [`OnHitEffect::BonusDamageIfMarked`]
/// is resolved by the orchestrator before the hit and is ignored here.
pub fn apply_on_hit(
    attacker: &CharacterSnapshot,
    target: &mut CharacterSnapshot,
    effects: &[OnHitEffect],
    rng: &mut impl CombatRng,
    config: &CombatConfig,
) -> HitEffectReport {
    let mut report = HitEffectReport::default();
    let params = &config.effects;
    let bonuses = &attacker.bonuses;

    for effect in effects {
        let (apply, chance_bonus) = match effect {
            OnHitEffect::BonusDamageIfMarked(_) => continue,
            OnHitEffect::Stun(apply) => (apply, bonuses.additive(AdditiveStat::StunChanceBonus)),
            OnHitEffect::Dot { apply, .. }
            | OnHitEffect::ArmorShred { apply, .. }
            | OnHitEffect::Mark { apply, .. }
            | OnHitEffect::AshCloud { apply, .. }
            | OnHitEffect::Paralyze { apply, .. } => (apply, 0.0),
        };

        if let Some(HitCondition::TargetHpBelow(threshold)) = apply.condition
            && target.hp_ratio() >= threshold
        {
            continue;
        }
        if !rng.check(RollKind::Effect, apply.chance + chance_bonus) {
            continue;
        }

        let mut status = match *effect {
            OnHitEffect::Dot {
                kind,
                apply,
                tick_percent,
            } => dot_effect(attacker, kind, &apply, tick_percent, config),
            OnHitEffect::Stun(apply) => {
                ActiveStatusEffect::new(StatusKind::Stun, duration(&apply, params.stun_duration, 0))
            }
            OnHitEffect::ArmorShred { apply, fraction } => {
                let fraction = fraction.unwrap_or(params.armor_shred_fraction);
                ActiveStatusEffect::new(
                    StatusKind::ArmorShred,
                    duration(&apply, params.debuff_duration, 0),
                )
                .with_payload(shift_payload(StatShift {
                    armor: -target.armor * fraction,
                    ..StatShift::default()
                }))
            }
            OnHitEffect::Mark {
                apply,
                damage_taken_mult,
            } => {
                let mult = damage_taken_mult.unwrap_or(params.mark_damage_taken)
                    + bonuses.additive(AdditiveStat::MarkEffectBonus);
                let rounds = duration(
                    &apply,
                    params.mark_duration,
                    bonuses.additive_count(AdditiveStat::MarkDurationBonus),
                );
                ActiveStatusEffect::new(StatusKind::Mark, rounds).with_payload(StatusPayload {
                    damage_taken_mult: mult,
                    ..StatusPayload::default()
                })
            }
            OnHitEffect::AshCloud {
                apply,
                accuracy_mult,
            } => {
                let mult = accuracy_mult.unwrap_or(params.ash_cloud_accuracy);
                let rounds = duration(
                    &apply,
                    params.debuff_duration,
                    bonuses.additive_count(AdditiveStat::AccuracyDebuffDurationBonus),
                );
                ActiveStatusEffect::new(StatusKind::AshCloud, rounds).with_payload(shift_payload(
                    StatShift {
                        accuracy: target.accuracy * (mult - 1.0),
                        ..StatShift::default()
                    },
                ))
            }
            OnHitEffect::Paralyze {
                apply,
                resist_reduction,
            } => {
                let reduction = resist_reduction.unwrap_or(params.paralyze_resist_shred);
                let (min, max) = target.resistance_range;
                let current = target.resistances.lightning;
                let rounds = duration(
                    &apply,
                    params.debuff_duration,
                    bonuses.additive_count(AdditiveStat::LightningResistShredDurationBonus),
                );
                ActiveStatusEffect::new(StatusKind::Paralyze, rounds).with_payload(shift_payload(
                    StatShift {
                        lightning_resist: (current - reduction).clamp(min, max) - current,
                        ..StatShift::default()
                    },
                ))
            }
            OnHitEffect::BonusDamageIfMarked(_) => continue,
        };

        let rounds = target.racial.reduce_debuff(status.remaining_rounds);
        status.remaining_rounds = rounds;
        status.max_duration = rounds;

        let kind = status.kind;
        let shift = status.payload.shift;
        match target.status.apply(status) {
            Applied::New => {
                target.apply_shift(&shift);
                report.events.push(format!("{kind} applied ({rounds} rounds)"));
            }
            Applied::Refreshed {
                stacks,
                remaining_rounds,
            } => report.events.push(format!(
                "{kind} refreshed ({stacks} stacks, {remaining_rounds} rounds)"
            )),
        }
        report.applied.push(kind);
    }

    report
}

fn duration(apply: &Application, default: u32, bonus: u32) -> u32 {
    apply.duration.unwrap_or(default) + bonus
}

fn shift_payload(shift: StatShift) -> StatusPayload {
    StatusPayload {
        shift,
        ..StatusPayload::default()
    }
}

fn dot_effect(
    attacker: &CharacterSnapshot,
    kind: DotKind,
    apply: &Application,
    tick_percent: Option<f64>,
    config: &CombatConfig,
) -> ActiveStatusEffect {
    let params = &config.effects;
    let bonuses = &attacker.bonuses;
    let (tick, bonus, max_stacks, resisted_by) = match kind {
        DotKind::Bleed => (
            DotTick::Flat(attacker.weapon_base_damage * params.bleed_tick_ratio),
            bonuses.additive_count(AdditiveStat::BleedDurationBonus),
            apply.max_stacks,
            None,
        ),
        DotKind::Poison => (
            DotTick::PercentOfCurrentHp(tick_percent.unwrap_or(params.poison_tick_percent)),
            bonuses.additive_count(AdditiveStat::PoisonDurationBonus),
            apply.max_stacks,
            None,
        ),
        DotKind::Burn => (
            DotTick::PercentOfCurrentHp(
                params.burn_tick_percent * bonuses.factor(MultiplicativeStat::BurnTickMult),
            ),
            0,
            apply.max_stacks + bonuses.additive_count(AdditiveStat::BurnMaxStacksBonus),
            Some(DamageType::Fire),
        ),
    };

    let mut effect = ActiveStatusEffect::new(kind.status(), duration(apply, params.debuff_duration, bonus))
        .with_stacks(apply.stacks, max_stacks)
        .with_tick(tick);
    effect.resisted_by = resisted_by;
    effect.ward_absorbs = resisted_by.is_some();
    effect
}

/// Ticks every round-based effect on `snapshot` once.
///
/// DOT damage is summed from the HP at the start of the tick and returned for
/// the caller to subtract. Resisted DOTs are absorbed by ward here, and the
/// ward is consumed. Effects that reach zero rounds are removed and their stat
/// deltas reverted. Stun and charge buffs are left untouched.
pub fn tick_status_effects(snapshot: &mut CharacterSnapshot) -> TickReport {
    let mut report = TickReport::default();
    let current_hp = snapshot.current_hp;

    let mut ward = snapshot.ward;
    for effect in snapshot.status.iter_mut() {
        if effect.kind.is_dot() {
            let mut damage = effect.tick_damage(current_hp);
            if let Some(damage_type) = effect.resisted_by {
                damage *= 1.0 - snapshot.resistances.get(damage_type);
            }
            if effect.ward_absorbs {
                let absorbed = super::damage::ward_absorption(ward, damage);
                ward -= absorbed;
                damage -= absorbed;
                report.ward_absorbed += absorbed;
            }
            let damage = damage.max(0.0);
            if damage > 0.0 {
                report.events.push(format!(
                    "{} deals {damage:.1} ({} stacks)",
                    effect.kind, effect.stacks
                ));
            }
            report.damage += damage;
        }

        if effect.kind.ticks_by_round() {
            effect.remaining_rounds = effect.remaining_rounds.saturating_sub(1);
            if effect.remaining_rounds == 0 {
                report.expired.push(effect.kind);
            }
        }
    }
    snapshot.ward = ward;

    for kind in &report.expired {
        if let Some(expired) = snapshot.status.remove(*kind) {
            snapshot.revert_shift(&expired.payload.shift);
            report.events.push(format!("{kind} expired"));
        }
    }

    report
}

/// Spends one charge of any live charge buff.
///
/// Returns the combined damage multiplier; buffs whose last charge is spent
/// are removed.
pub fn consume_charges(snapshot: &mut CharacterSnapshot) -> f64 {
    let mut mult = 1.0;
    let mut spent = Vec::new();
    for effect in snapshot.status.iter_mut() {
        if let Some(charges) = effect.payload.charges.as_mut()
            && *charges > 0
        {
            mult *= effect.payload.damage_mult;
            *charges -= 1;
            if *charges == 0 {
                spent.push(effect.kind);
            }
        }
    }
    for kind in spent {
        snapshot.status.remove(kind);
    }
    mult
}

/// Decrements the stun counter after a skipped turn, removing it at zero.
pub fn spend_stun_turn(snapshot: &mut CharacterSnapshot) -> u32 {
    let Some(stun) = snapshot.status.get_mut(StatusKind::Stun) else {
        return 0;
    };
    stun.remaining_rounds = stun.remaining_rounds.saturating_sub(1);
    let left = stun.remaining_rounds;
    if left == 0 {
        snapshot.status.remove(StatusKind::Stun);
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{ChargeKind, StanceBonuses, StanceKind};
    use crate::env::FixedRolls;
    use crate::stats::{BonusBundle, RacialTraits};
    use crate::testing::snapshot;

    #[test]
    fn empty_on_use_is_a_noop() {
        let mut caster = snapshot();
        let target = snapshot();
        let before = caster.clone();
        let report = apply_on_use(
            &mut caster,
            &target,
            &[],
            UseContext::default(),
            &CombatConfig::default(),
        );
        assert_eq!(report, UseReport::default());
        assert_eq!(caster, before);
    }

    #[test]
    fn conditional_damage_bonus() {
        let mut caster = snapshot();
        let mut target = snapshot();
        target.current_hp = target.max_hp * 0.2;
        let effects = [
            OnUseEffect::DamageBonus {
                mult: 1.5,
                condition: Some(UseCondition::ActingFirst),
            },
            OnUseEffect::DamageBonus {
                mult: 2.0,
                condition: Some(UseCondition::TargetHpBelow(0.30)),
            },
        ];
        let config = CombatConfig::default();

        let second = apply_on_use(&mut caster, &target, &effects, UseContext::default(), &config);
        assert_eq!(second.damage_mult, 2.0);

        let first = apply_on_use(
            &mut caster,
            &target,
            &effects,
            UseContext { acting_first: true },
            &config,
        );
        assert_eq!(first.damage_mult, 3.0);
    }

    #[test]
    fn stance_shift_reverts_on_expiry() {
        let mut caster = snapshot();
        let target = snapshot();
        let before = caster.clone();
        let stance = StanceSpec {
            kind: StanceKind::ColossusStance,
            duration: Some(1),
            bonuses: StanceBonuses {
                damage_mult: 1.25,
                armor_mult: 1.5,
                ..StanceBonuses::default()
            },
        };
        apply_on_use(
            &mut caster,
            &target,
            &[OnUseEffect::Stance(stance)],
            UseContext::default(),
            &CombatConfig::default(),
        );
        assert_eq!(caster.armor, before.armor * 1.5);
        assert_eq!(caster.damage.melee, before.damage.melee * 1.25);

        let report = tick_status_effects(&mut caster);
        assert_eq!(report.expired, vec![StatusKind::ColossusStance]);
        assert!((caster.armor - before.armor).abs() < 1e-9);
        assert!((caster.damage.melee - before.damage.melee).abs() < 1e-9);
    }

    #[test]
    fn bleed_ticks_flat_for_its_duration() {
        let attacker = snapshot();
        let mut target = snapshot();
        target.armor = 10_000.0;
        let bleed = OnHitEffect::Dot {
            kind: DotKind::Bleed,
            apply: Application {
                duration: Some(2),
                ..Application::default()
            },
            tick_percent: None,
        };
        let config = CombatConfig::default();
        let report = apply_on_hit(
            &attacker,
            &mut target,
            &[bleed],
            &mut FixedRolls::always(),
            &config,
        );
        assert_eq!(report.applied, vec![StatusKind::Bleed]);
        assert_eq!(target.status.get(StatusKind::Bleed).map(|b| b.remaining_rounds), Some(2));

        let expected = attacker.weapon_base_damage * config.effects.bleed_tick_ratio;
        for _ in 0..2 {
            let tick = tick_status_effects(&mut target);
            assert_eq!(tick.damage, expected);
        }
        assert!(!target.status.has(StatusKind::Bleed));
        assert_eq!(tick_status_effects(&mut target).damage, 0.0);
    }

    #[test]
    fn failed_chance_applies_nothing() {
        let attacker = snapshot();
        let mut target = snapshot();
        let stun = OnHitEffect::Stun(Application {
            chance: 0.35,
            ..Application::default()
        });
        let report = apply_on_hit(
            &attacker,
            &mut target,
            &[stun],
            &mut FixedRolls::never(),
            &CombatConfig::default(),
        );
        assert!(report.applied.is_empty());
        assert_eq!(target.status.stun_turns(), 0);
    }

    #[test]
    fn burn_is_resisted_then_absorbed_by_ward() {
        let attacker = snapshot();
        let mut target = snapshot();
        target.current_hp = 1_000.0;
        target.resistances.fire = 0.5;
        target.ward = 5.0;
        let burn = OnHitEffect::Dot {
            kind: DotKind::Burn,
            apply: Application {
                duration: Some(3),
                ..Application::default()
            },
            tick_percent: None,
        };
        apply_on_hit(
            &attacker,
            &mut target,
            &[burn],
            &mut FixedRolls::always(),
            &CombatConfig::default(),
        );

        // 1000 * 0.03 * 0.5 = 15, ward takes 5
        let tick = tick_status_effects(&mut target);
        assert!((tick.ward_absorbed - 5.0).abs() < 1e-9);
        assert!((tick.damage - 10.0).abs() < 1e-9);
        assert_eq!(target.ward, 0.0);
    }

    #[test]
    fn dwarf_debuffs_are_shortened() {
        let attacker = snapshot();
        let mut target = snapshot();
        target.racial = RacialTraits::for_race(crate::env::RaceKind::Dwarf);
        let mark = OnHitEffect::Mark {
            apply: Application::default(),
            damage_taken_mult: None,
        };
        apply_on_hit(
            &attacker,
            &mut target,
            &[mark],
            &mut FixedRolls::always(),
            &CombatConfig::default(),
        );
        let mark = target.status.get(StatusKind::Mark).expect("mark applied");
        assert_eq!(mark.remaining_rounds, 2);
        assert_eq!(target.status.mark_multiplier(), 1.12);
    }

    #[test]
    fn charges_are_spent_per_hit() {
        let mut caster = snapshot();
        caster.bonuses = BonusBundle::neutral();
        let target = snapshot();
        let spec = ChargeSpec {
            kind: ChargeKind::StaticCharge,
            charges: Some(2),
            damage_mult: None,
        };
        apply_on_use(
            &mut caster,
            &target,
            &[OnUseEffect::Charges(spec)],
            UseContext::default(),
            &CombatConfig::default(),
        );
        // charge buffs ignore the round tick
        tick_status_effects(&mut caster);
        assert_eq!(consume_charges(&mut caster), 1.2);
        assert_eq!(consume_charges(&mut caster), 1.2);
        assert!(!caster.status.has(StatusKind::StaticCharge));
        assert_eq!(consume_charges(&mut caster), 1.0);
    }

    #[test]
    fn stun_counts_skipped_turns() {
        let attacker = snapshot();
        let mut target = snapshot();
        apply_on_hit(
            &attacker,
            &mut target,
            &[OnHitEffect::Stun(Application {
                duration: Some(2),
                ..Application::default()
            })],
            &mut FixedRolls::always(),
            &CombatConfig::default(),
        );
        tick_status_effects(&mut target);
        assert_eq!(target.status.stun_turns(), 2);
        assert_eq!(spend_stun_turn(&mut target), 1);
        assert_eq!(spend_stun_turn(&mut target), 0);
        assert!(!target.status.has(StatusKind::Stun));
    }
}
