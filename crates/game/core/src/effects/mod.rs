//! Data-driven effect specifications.
//!
//! Authored documents ([`RawEffectMap`]) are parsed once, when content loads,
//! into closed enums ([`NodeModifier`], [`SkillEffectSpec`]). Parse problems
//! are returned as [`EffectDiagnostic`]s alongside the usable part of the
//! document, so bad content degrades instead of aborting a load or a match.
mod parse;
mod raw;
mod spec;

pub use parse::{EffectDiagnostic, EffectProblem, Parsed, parse_node_effect, parse_skill_effect};
pub use raw::{RawEffectMap, RawValue, raw_map};
pub use spec::{
    AdditiveStat, Application, ChargeKind, ChargeSpec, DotKind, HitCondition, MultiHit,
    MultiplicativeStat, NodeModifier, OnHitEffect, OnUseEffect, SkillEffectSpec, StanceBonuses,
    StanceKind, StanceSpec, ThresholdKind, UseCondition,
};
