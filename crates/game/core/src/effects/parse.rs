//! Load-time parsing of authored effect documents.
//!
//! Parsing never fails as a whole. Each field that cannot be understood is
//! skipped and reported as an [`EffectDiagnostic`]; everything else in the
//! document still takes effect.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::config::CombatConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::stats::WeaponCategory;

use super::raw::{RawEffectMap, RawValue};
use super::spec::{
    AdditiveStat, Application, ChargeKind, ChargeSpec, DotKind, HitCondition, MultiHit,
    MultiplicativeStat, NodeModifier, OnHitEffect, OnUseEffect, SkillEffectSpec, StanceBonuses,
    StanceKind, StanceSpec, ThresholdKind, UseCondition,
};

/// Parse output plus everything that was skipped along the way.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub diagnostics: Vec<EffectDiagnostic>,
}

impl<T> Parsed<T> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Why a field was skipped.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EffectProblem {
    #[error("unknown key")]
    UnknownKey,

    #[error("required field is missing")]
    MissingField,

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} is outside the allowed range")]
    OutOfRange { value: f64 },

    #[error("unrecognised condition `{0}`")]
    BadCondition(String),

    #[error("unknown weapon type `{0}`")]
    UnknownWeapon(String),

    #[error("companion field has no primary field in the same node")]
    OrphanCompanion,
}

/// A malformed field inside an effect document.
///
/// `path` is dotted from the document root, e.g. `onHit.applyBleed.chance`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{path}: {problem}")]
pub struct EffectDiagnostic {
    pub path: String,
    pub problem: EffectProblem,
}

impl GameError for EffectDiagnostic {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self.problem {
            EffectProblem::UnknownKey => "EFFECT_UNKNOWN_KEY",
            EffectProblem::MissingField => "EFFECT_MISSING_FIELD",
            EffectProblem::WrongType { .. } => "EFFECT_WRONG_TYPE",
            EffectProblem::OutOfRange { .. } => "EFFECT_OUT_OF_RANGE",
            EffectProblem::BadCondition(_) => "EFFECT_BAD_CONDITION",
            EffectProblem::UnknownWeapon(_) => "EFFECT_UNKNOWN_WEAPON",
            EffectProblem::OrphanCompanion => "EFFECT_ORPHAN_COMPANION",
        }
    }
}

// ============================================================================
// Field reader
// ============================================================================

/// Typed access to one map, tracking which keys were consumed.
struct FieldReader<'a, 'd> {
    map: &'a RawEffectMap,
    prefix: String,
    used: BTreeSet<&'a str>,
    diagnostics: &'d mut Vec<EffectDiagnostic>,
}

impl<'a, 'd> FieldReader<'a, 'd> {
    fn new(map: &'a RawEffectMap, prefix: &str, diagnostics: &'d mut Vec<EffectDiagnostic>) -> Self {
        Self {
            map,
            prefix: prefix.to_owned(),
            used: BTreeSet::new(),
            diagnostics,
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    fn report(&mut self, key: &str, problem: EffectProblem) {
        let path = self.path(key);
        self.diagnostics.push(EffectDiagnostic { path, problem });
    }

    fn take(&mut self, key: &str) -> Option<&'a RawValue> {
        let (stored, value) = self.map.get_key_value(key)?;
        self.used.insert(stored.as_str());
        Some(value)
    }

    fn number_in(&mut self, key: &str, valid: impl Fn(f64) -> bool) -> Option<f64> {
        let raw = self.take(key)?;
        match raw.as_f64() {
            Some(value) if valid(value) => Some(value),
            Some(value) => {
                self.report(key, EffectProblem::OutOfRange { value });
                None
            }
            None => {
                self.report(
                    key,
                    EffectProblem::WrongType {
                        expected: "number",
                        found: raw.type_name(),
                    },
                );
                None
            }
        }
    }

    fn number(&mut self, key: &str) -> Option<f64> {
        self.number_in(key, |_| true)
    }

    fn fraction(&mut self, key: &str) -> Option<f64> {
        self.number_in(key, |value| (0.0..=1.0).contains(&value))
    }

    fn factor(&mut self, key: &str) -> Option<f64> {
        self.number_in(key, |value| value >= 0.0)
    }

    fn whole(&mut self, key: &str, min: u32) -> Option<u32> {
        let raw = self.take(key)?;
        match raw.as_u32() {
            Some(value) if value >= min => Some(value),
            _ => {
                match raw.as_f64() {
                    Some(value) => self.report(key, EffectProblem::OutOfRange { value }),
                    None => self.report(
                        key,
                        EffectProblem::WrongType {
                            expected: "whole number",
                            found: raw.type_name(),
                        },
                    ),
                }
                None
            }
        }
    }

    fn flag(&mut self, key: &str) -> Option<bool> {
        let raw = self.take(key)?;
        let value = raw.as_bool();
        if value.is_none() {
            self.report(
                key,
                EffectProblem::WrongType {
                    expected: "bool",
                    found: raw.type_name(),
                },
            );
        }
        value
    }

    fn text(&mut self, key: &str) -> Option<&'a str> {
        let raw = self.take(key)?;
        let value = raw.as_str();
        if value.is_none() {
            self.report(
                key,
                EffectProblem::WrongType {
                    expected: "text",
                    found: raw.type_name(),
                },
            );
        }
        value
    }

    fn section(&mut self, key: &str) -> Option<&'a RawEffectMap> {
        let raw = self.take(key)?;
        let value = raw.as_map();
        if value.is_none() {
            self.report(
                key,
                EffectProblem::WrongType {
                    expected: "map",
                    found: raw.type_name(),
                },
            );
        }
        value
    }

    fn hp_condition(&mut self, key: &str) -> Option<f64> {
        let text = self.text(key)?;
        let threshold = parse_target_hp_condition(text);
        if threshold.is_none() {
            self.report(key, EffectProblem::BadCondition(text.to_owned()));
        }
        threshold
    }

    /// Reports every key that was never consumed.
    fn finish(self) {
        let Self {
            map,
            prefix,
            used,
            diagnostics,
        } = self;
        for key in map.keys().filter(|key| !used.contains(key.as_str())) {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            diagnostics.push(EffectDiagnostic {
                path,
                problem: EffectProblem::UnknownKey,
            });
        }
    }
}

/// Parses `targetHPPercent<X` into `X`.
fn parse_target_hp_condition(text: &str) -> Option<f64> {
    let (subject, threshold) = text.split_once('<')?;
    if subject.trim() != "targetHPPercent" {
        return None;
    }
    let value = f64::from_str(threshold.trim()).ok()?;
    (value > 0.0 && value <= 1.0).then_some(value)
}

// ============================================================================
// Passive nodes
// ============================================================================

enum NodeKey {
    Add(AdditiveStat),
    Multiply(MultiplicativeStat),
    /// Authored as a delta, combined as the factor `1 + delta`.
    MultiplyDelta(MultiplicativeStat),
    BlockCap,
}

fn node_key(key: &str) -> Option<NodeKey> {
    use AdditiveStat as A;
    use MultiplicativeStat as M;

    let parsed = match key {
        "maxHPPercent" => NodeKey::Add(A::MaxHpPercent),
        "maxManaPercent" => NodeKey::Add(A::MaxManaPercent),
        "initiative" => NodeKey::Add(A::InitiativeFlat),
        "increasedDamage" => NodeKey::Add(A::IncreasedDamage),
        "increasedAccuracy" => NodeKey::Add(A::IncreasedAccuracy),
        "increasedCritChance" => NodeKey::Add(A::CritChanceFlat),
        "increasedArmor" => NodeKey::Add(A::IncreasedArmor),
        "increasedEvasion" => NodeKey::Add(A::IncreasedEvasion),
        "increasedWard" => NodeKey::Add(A::IncreasedWard),
        "increasedBlockChance" => NodeKey::Add(A::IncreasedBlockChance),
        "armorPenetration" => NodeKey::Add(A::ArmorPenetration),
        "manaCostReduction" => NodeKey::Add(A::ManaCostReduction),
        "cooldownReduction" => NodeKey::Add(A::CooldownReduction),
        "markDurationBonus" => NodeKey::Add(A::MarkDurationBonus),
        "markEffectBonus" => NodeKey::Add(A::MarkEffectBonus),
        "poisonDurationBonus" => NodeKey::Add(A::PoisonDurationBonus),
        "bleedDurationBonus" => NodeKey::Add(A::BleedDurationBonus),
        "buffDurationBonus" => NodeKey::Add(A::BuffDurationBonus),
        "activeSkillMultBonus" | "activeSkillMult" => NodeKey::Add(A::ActiveSkillMultBonus),
        "stunChance" => NodeKey::Add(A::StunChanceBonus),
        "lightningResistShredDurationBonus" => {
            NodeKey::Add(A::LightningResistShredDurationBonus)
        }
        "chargeBonus" => NodeKey::Add(A::ChargeBonus),
        "accuracyDebuffDurationBonus" => NodeKey::Add(A::AccuracyDebuffDurationBonus),
        "burnMaxStacksBonus" => NodeKey::Add(A::BurnMaxStacksBonus),
        "lifesteal" => NodeKey::Add(A::Lifesteal),
        "blockCapBonus" => NodeKey::BlockCap,
        "accuracyMult" => NodeKey::Multiply(M::AccuracyMult),
        "critMultiBonus" => NodeKey::MultiplyDelta(M::CritMultiplierMult),
        "firstSkillManaCostMult" => NodeKey::Multiply(M::FirstSkillManaCostMult),
        "firstHitDamageTakenMult" => NodeKey::Multiply(M::FirstHitDamageTakenMult),
        "lowHPDamageTakenMult" => NodeKey::Multiply(M::LowHpDamageTakenMult),
        "damageBonusLowHP" => NodeKey::Multiply(M::ExecutionWindowMult),
        "damageVsMarked" => NodeKey::Multiply(M::DamageVsMarkedMult),
        "firstStrikeDamage" => NodeKey::Multiply(M::FirstStrikeDamageMult),
        "blockSuccessDamageTakenMult" | "blockedHitDamageTakenMult" => {
            NodeKey::Multiply(M::BlockSuccessDamageTakenMult)
        }
        "riposteAfterBlockMult" | "riposteDamage" => NodeKey::Multiply(M::RiposteAfterBlockMult),
        "stunDamageTakenBonus" => NodeKey::Multiply(M::StunDamageTakenMult),
        "burnTickMult" => NodeKey::Multiply(M::BurnTickMult),
        _ => return None,
    };
    Some(parsed)
}

/// Parses one passive node effect document into modifiers.
pub fn parse_node_effect(raw: &RawEffectMap) -> Parsed<Vec<NodeModifier>> {
    let mut diagnostics = Vec::new();
    let mut modifiers = Vec::new();
    let mut reader = FieldReader::new(raw, "", &mut diagnostics);

    let primaries: Vec<(&str, NodeKey)> = raw
        .keys()
        .filter_map(|key| node_key(key).map(|parsed| (key.as_str(), parsed)))
        .collect();

    let has = |wanted: MultiplicativeStat| {
        primaries
            .iter()
            .any(|(_, key)| matches!(key, NodeKey::Multiply(stat) if *stat == wanted))
    };
    let has_low_hp = has(MultiplicativeStat::LowHpDamageTakenMult);
    let has_execution = has(MultiplicativeStat::ExecutionWindowMult);
    let has_cooldown = primaries
        .iter()
        .any(|(_, key)| matches!(key, NodeKey::Add(AdditiveStat::CooldownReduction)));

    let weapon = match reader.text("weaponType") {
        Some(name) => match WeaponCategory::from_str(name) {
            Ok(weapon) => Some(weapon),
            Err(_) => {
                reader.report("weaponType", EffectProblem::UnknownWeapon(name.to_owned()));
                None
            }
        },
        None => None,
    };

    for (key, parsed) in primaries {
        match parsed {
            NodeKey::Add(stat) => {
                let Some(value) = reader.number(key) else {
                    continue;
                };
                match (stat, weapon) {
                    (AdditiveStat::IncreasedDamage, Some(weapon)) => {
                        modifiers.push(NodeModifier::WeaponDamage { weapon, value })
                    }
                    _ => modifiers.push(NodeModifier::Add { stat, value }),
                }
            }
            NodeKey::Multiply(stat) => {
                if let Some(factor) = reader.factor(key) {
                    modifiers.push(NodeModifier::Multiply { stat, factor });
                }
            }
            NodeKey::MultiplyDelta(stat) => {
                if let Some(delta) = reader.number_in(key, |value| value > -1.0) {
                    modifiers.push(NodeModifier::Multiply {
                        stat,
                        factor: 1.0 + delta,
                    });
                }
            }
            NodeKey::BlockCap => {
                if let Some(value) = reader.fraction(key) {
                    modifiers.push(NodeModifier::BlockCapBonus(value));
                }
            }
        }
    }

    if raw.contains_key("hpThreshold") {
        if let Some(value) = reader.fraction("hpThreshold") {
            if has_low_hp {
                modifiers.push(NodeModifier::Threshold {
                    kind: ThresholdKind::LowHpTaken,
                    value,
                });
            }
            if has_execution {
                modifiers.push(NodeModifier::Threshold {
                    kind: ThresholdKind::Execution,
                    value,
                });
            }
            if !has_low_hp && !has_execution {
                reader.report("hpThreshold", EffectProblem::OrphanCompanion);
            }
        }
    }

    for (key, kind) in [
        ("cdThreshold", ThresholdKind::CooldownThreshold),
        ("minCooldown", ThresholdKind::MinCooldown),
    ] {
        if !raw.contains_key(key) {
            continue;
        }
        if let Some(value) = reader.whole(key, 0) {
            if has_cooldown {
                modifiers.push(NodeModifier::Threshold {
                    kind,
                    value: f64::from(value),
                });
            } else {
                reader.report(key, EffectProblem::OrphanCompanion);
            }
        }
    }

    // Authored next to stunDamageTakenBonus; the stun effect carries its own duration.
    let _ = reader.take("stunDuration");

    reader.finish();
    Parsed {
        value: modifiers,
        diagnostics,
    }
}

// ============================================================================
// Skills
// ============================================================================

/// Parses one skill effect document.
pub fn parse_skill_effect(raw: &RawEffectMap) -> Parsed<SkillEffectSpec> {
    let mut diagnostics = Vec::new();
    let mut spec = SkillEffectSpec::default();
    let mut reader = FieldReader::new(raw, "", &mut diagnostics);

    let on_use = reader.section("onUse");
    let on_hit = reader.section("onHit");
    let multi_hit = reader.section("multiHit");
    reader.finish();

    if let Some(section) = on_use {
        spec.on_use = parse_on_use(section, &mut diagnostics);
    }
    if let Some(section) = on_hit {
        spec.on_hit = parse_on_hit(section, &mut diagnostics);
    }
    if let Some(section) = multi_hit {
        spec.multi_hit = parse_multi_hit(section, &mut diagnostics);
    }

    Parsed {
        value: spec,
        diagnostics,
    }
}

fn parse_multi_hit(section: &RawEffectMap, diagnostics: &mut Vec<EffectDiagnostic>) -> Option<MultiHit> {
    let mut reader = FieldReader::new(section, "multiHit", diagnostics);
    let hits = if section.contains_key("hits") {
        reader.whole("hits", 1).map(|hits| hits.min(CombatConfig::MAX_SUB_HITS))
    } else {
        reader.report("hits", EffectProblem::MissingField);
        None
    };
    let each_hit_multi = reader.factor("eachHitMulti").unwrap_or(1.0);
    reader.finish();
    hits.map(|hits| MultiHit {
        hits,
        each_hit_multi,
    })
}

fn parse_on_use(section: &RawEffectMap, diagnostics: &mut Vec<EffectDiagnostic>) -> Vec<OnUseEffect> {
    let mut effects = Vec::new();
    let mut nested = Vec::new();
    let mut reader = FieldReader::new(section, "onUse", diagnostics);

    if let Some(bonus) = reader.fraction("critBonus") {
        effects.push(OnUseEffect::CritBonus(bonus));
    }
    if let Some(pen) = reader.fraction("armorPenetration") {
        effects.push(OnUseEffect::ArmorPenetration(pen));
    }
    if let Some(mult) = reader.factor("accuracyMult") {
        effects.push(OnUseEffect::AccuracyMult(mult));
    }
    if let Some(bonus) = reader.number("critMultiBonus") {
        let cap = reader.factor("critMultiCap");
        effects.push(OnUseEffect::CritMultiBonus { bonus, cap });
    }
    if let Some(mult) = reader.factor("damageBonus") {
        let condition = match reader.text("condition") {
            Some("isActingFirst") => Some(UseCondition::ActingFirst),
            Some(text) => match parse_target_hp_condition(text) {
                Some(threshold) => Some(UseCondition::TargetHpBelow(threshold)),
                None => {
                    reader.report("condition", EffectProblem::BadCondition(text.to_owned()));
                    None
                }
            },
            None => None,
        };
        effects.push(OnUseEffect::DamageBonus { mult, condition });
    }

    for (key, kind) in [
        ("applySwordDance", StanceKind::SwordDance),
        ("applyCounterStance", StanceKind::CounterStance),
        ("applyColossusStance", StanceKind::ColossusStance),
        ("applyShadowStep", StanceKind::ShadowStep),
        ("applyHunterFocus", StanceKind::HunterFocus),
    ] {
        if let Some(body) = reader.section(key) {
            nested.push((key, StanceOrCharge::Stance(kind), body));
        }
    }
    for (key, kind) in [
        ("applyStaticCharge", ChargeKind::StaticCharge),
        ("applyAshArmor", ChargeKind::AshArmor),
    ] {
        if let Some(body) = reader.section(key) {
            nested.push((key, StanceOrCharge::Charge(kind), body));
        }
    }
    reader.finish();

    for (key, kind, body) in nested {
        let prefix = format!("onUse.{}", key);
        let mut reader = FieldReader::new(body, &prefix, diagnostics);
        // Stacking keys are accepted for symmetry with on-hit effects; self-buffs never stack.
        let _ = reader.whole("maxStacks", 1);
        let _ = reader.flag("refreshDuration");
        match kind {
            StanceOrCharge::Stance(kind) => {
                let duration = reader.whole("duration", 1);
                let _ = reader.whole("riposteDuration", 1);
                let defaults = StanceBonuses::default();
                let bonuses = StanceBonuses {
                    evasion_bonus: reader.number("evasionBonus").unwrap_or(defaults.evasion_bonus),
                    evasion_mult: reader.factor("evasionMult").unwrap_or(defaults.evasion_mult),
                    crit_bonus: reader.fraction("critBonus").unwrap_or(defaults.crit_bonus),
                    damage_mult: reader.factor("damageMult").unwrap_or(defaults.damage_mult),
                    armor_mult: reader.factor("armorMult").unwrap_or(defaults.armor_mult),
                    accuracy_mult: reader.factor("accuracyMult").unwrap_or(defaults.accuracy_mult),
                    riposte_bonus: reader
                        .number("riposteDamageBonus")
                        .unwrap_or(defaults.riposte_bonus),
                };
                effects.push(OnUseEffect::Stance(StanceSpec {
                    kind,
                    duration,
                    bonuses,
                }));
            }
            StanceOrCharge::Charge(kind) => {
                let charges = reader.whole("charges", 1);
                let damage_mult = reader.factor("damageMult");
                effects.push(OnUseEffect::Charges(ChargeSpec {
                    kind,
                    charges,
                    damage_mult,
                }));
            }
        }
        reader.finish();
    }

    effects
}

enum StanceOrCharge {
    Stance(StanceKind),
    Charge(ChargeKind),
}

#[derive(Clone, Copy)]
enum HitKey {
    Dot(DotKind),
    Stun,
    ArmorShred,
    Mark,
    AshCloud,
    Paralyze,
}

fn parse_on_hit(section: &RawEffectMap, diagnostics: &mut Vec<EffectDiagnostic>) -> Vec<OnHitEffect> {
    let mut effects = Vec::new();
    let mut nested = Vec::new();
    let mut reader = FieldReader::new(section, "onHit", diagnostics);

    for (key, kind) in [
        ("applyBleed", HitKey::Dot(DotKind::Bleed)),
        ("applyPoison", HitKey::Dot(DotKind::Poison)),
        ("applyBurn", HitKey::Dot(DotKind::Burn)),
        ("applyStun", HitKey::Stun),
        ("applyArmorShred", HitKey::ArmorShred),
        ("applyMark", HitKey::Mark),
        ("applyAshCloud", HitKey::AshCloud),
        ("applyParalyze", HitKey::Paralyze),
    ] {
        if let Some(body) = reader.section(key) {
            nested.push((key, kind, body));
        }
    }
    if let Some(mult) = reader.factor("bonusDamageIfMarked") {
        effects.push(OnHitEffect::BonusDamageIfMarked(mult));
    }
    reader.finish();

    for (key, kind, body) in nested {
        let prefix = format!("onHit.{}", key);
        let mut reader = FieldReader::new(body, &prefix, diagnostics);
        let apply = read_application(&mut reader);
        let effect = match kind {
            HitKey::Dot(kind) => OnHitEffect::Dot {
                kind,
                apply,
                tick_percent: reader.fraction("tickPercent"),
            },
            HitKey::Stun => OnHitEffect::Stun(apply),
            HitKey::ArmorShred => OnHitEffect::ArmorShred {
                apply,
                fraction: reader.fraction("fraction"),
            },
            HitKey::Mark => OnHitEffect::Mark {
                apply,
                damage_taken_mult: reader.factor("damageTakenMult"),
            },
            HitKey::AshCloud => OnHitEffect::AshCloud {
                apply,
                accuracy_mult: reader.factor("accuracyMult"),
            },
            HitKey::Paralyze => OnHitEffect::Paralyze {
                apply,
                resist_reduction: reader.fraction("resistReduction"),
            },
        };
        reader.finish();
        effects.push(effect);
    }

    effects
}

fn read_application(reader: &mut FieldReader<'_, '_>) -> Application {
    let defaults = Application::default();
    let condition = reader
        .hp_condition("condition")
        .map(HitCondition::TargetHpBelow);
    Application {
        chance: reader.fraction("chance").unwrap_or(defaults.chance),
        duration: reader.whole("duration", 1),
        max_stacks: reader.whole("maxStacks", 1).unwrap_or(defaults.max_stacks),
        stacks: reader.whole("stacks", 1).unwrap_or(defaults.stacks),
        refresh_duration: reader
            .flag("refreshDuration")
            .unwrap_or(defaults.refresh_duration),
        condition,
    }
}
