//! Combat resolution.
//!
//! Everything here operates on [`CharacterSnapshot`](crate::stats::CharacterSnapshot)s
//! and draws randomness only through [`CombatRng`](crate::env::CombatRng).
//!
//! - [`resolve_attack`]: one hit check, crit check, damage roll, mitigation and block
//! - [`apply_on_use`] / [`apply_on_hit`]: skill effects
//! - [`tick_status_effects`]: start-of-round DOTs and expiry
//! - [`CombatOrchestrator`]: the full round loop producing a [`MatchResult`]
mod damage;
mod effects;
mod hit;
mod orchestrator;
mod record;
mod resolve;
mod status;

pub use damage::{
    DamageCategory, DamageType, armor_reduction, effective_armor, mitigate, ward_absorption,
};
pub use effects::{
    HitEffectReport, TickReport, UseContext, UseReport, apply_on_hit, apply_on_use,
    consume_charges, spend_stun_turn, tick_status_effects,
};
pub use hit::hit_chance;
pub use orchestrator::{ActionStateError, CombatOrchestrator, Combatant, simulate_match};
pub use record::{
    ActionRecord, MatchOutcome, MatchResult, MatchSummary, PerSide, RoundPhase, RoundRecord,
    Side, SideSummary, SubHitRecord,
};
pub use resolve::{AttackOutcome, AttackRequest, resolve_attack};
pub use status::{
    ActiveStatusEffect, Applied, DotTick, StatShift, StatusEffects, StatusKind, StatusPayload,
};
