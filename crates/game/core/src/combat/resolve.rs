//! Single attack resolution.

use crate::config::CombatConfig;
use crate::env::{CombatRng, RollKind};
use crate::stats::CharacterSnapshot;

use super::damage::{effective_armor, mitigate, ward_absorption};
use super::effects::UseReport;
use super::hit::hit_chance;
use super::{DamageCategory, DamageType};

/// Parameters of one attack resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRequest {
    pub category: DamageCategory,
    pub damage_type: DamageType,
    /// Combined action multiplier.
    pub multiplier: f64,
    pub crit_bonus: f64,
    pub armor_penetration: f64,
    pub accuracy_mult: f64,
    pub crit_multi_bonus: f64,
    pub crit_multi_cap: Option<f64>,
}

impl AttackRequest {
    pub fn new(category: DamageCategory, damage_type: DamageType, multiplier: f64) -> Self {
        Self {
            category,
            damage_type,
            multiplier,
            crit_bonus: 0.0,
            armor_penetration: 0.0,
            accuracy_mult: 1.0,
            crit_multi_bonus: 0.0,
            crit_multi_cap: None,
        }
    }

    /// Physical attack with multiplier 1.0.
    pub fn basic(category: DamageCategory) -> Self {
        Self::new(category, DamageType::Physical, 1.0)
    }

    /// Folds in the per-action modifiers of a cast.
    #[must_use]
    pub fn with_use_report(mut self, report: &UseReport) -> Self {
        self.crit_bonus += report.crit_bonus;
        self.armor_penetration += report.armor_penetration;
        self.accuracy_mult *= report.accuracy_mult;
        self.crit_multi_bonus += report.crit_multi_bonus;
        self.crit_multi_cap = report.crit_multi_cap.or(self.crit_multi_cap);
        self
    }
}

/// Result of one attack resolution.
///
/// `ward_absorbed` is reported only; the caller consumes the ward.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub hit: bool,
    pub crit: bool,
    pub blocked: bool,
    /// Damage before mitigation, block and ward.
    pub raw_damage: f64,
    /// Damage after mitigation and block, before ward.
    pub damage: f64,
    pub category: DamageCategory,
    pub damage_type: DamageType,
    pub ward_absorbed: f64,
}

impl AttackOutcome {
    pub fn miss(request: &AttackRequest) -> Self {
        Self {
            hit: false,
            crit: false,
            blocked: false,
            raw_damage: 0.0,
            damage: 0.0,
            category: request.category,
            damage_type: request.damage_type,
            ward_absorbed: 0.0,
        }
    }

    /// Damage that reaches HP.
    pub fn hp_damage(&self) -> f64 {
        (self.damage - self.ward_absorbed).max(0.0)
    }
}

/// Resolve a complete attack: hit, crit, damage roll, mitigation, block, ward.
///
/// Random samples are drawn in a fixed order (`Hit`, then `Crit`,
/// `Variance`, `Block`), and a miss draws nothing further. Neither snapshot is
/// modified.
pub fn resolve_attack(
    attacker: &CharacterSnapshot,
    defender: &CharacterSnapshot,
    request: &AttackRequest,
    rng: &mut impl CombatRng,
    config: &CombatConfig,
) -> AttackOutcome {
    // 1. Hit
    let chance = hit_chance(
        attacker.accuracy * request.accuracy_mult,
        defender.evasion,
        &config.hit,
    );
    if !rng.check(RollKind::Hit, chance) {
        return AttackOutcome::miss(request);
    }

    // 2. Crit
    let crit_chance = (attacker.crit_chance + request.crit_bonus).min(attacker.crit_chance_cap);
    let crit = rng.check(RollKind::Crit, crit_chance);

    // 3. Base damage
    let crit_multiplier = if request.crit_multi_bonus > 0.0 {
        let cap = request
            .crit_multi_cap
            .unwrap_or(attacker.crit_multiplier_cap);
        (attacker.crit_multiplier + request.crit_multi_bonus).min(cap.max(attacker.crit_multiplier))
    } else {
        attacker.crit_multiplier
    };
    let mut raw_damage = attacker.damage_for(request.category)
        * request.multiplier
        * rng.variance(config.damage.variance);
    if crit {
        raw_damage *= crit_multiplier;
    }
    let raw_damage = raw_damage.max(0.0);

    // 4. Mitigation
    let armor = effective_armor(
        defender.armor,
        attacker.armor_penetration + request.armor_penetration,
    );
    let mut damage = mitigate(
        raw_damage,
        request.damage_type,
        armor,
        defender.resistance(request.damage_type),
        config.damage.armor_constant,
    );

    // 5. Block
    let blocked = rng.check(RollKind::Block, defender.block_chance);
    if blocked {
        damage *= 1.0 - defender.block_reduction;
    }

    // 6. Ward
    let ward_absorbed = if request.damage_type.is_physical() {
        0.0
    } else {
        ward_absorption(defender.ward, damage)
    };

    tracing::trace!(
        category = %request.category,
        damage_type = %request.damage_type,
        crit,
        blocked,
        raw_damage,
        damage,
        ward_absorbed,
        "attack resolved"
    );

    AttackOutcome {
        hit: true,
        crit,
        blocked,
        raw_damage,
        damage: damage.max(0.0),
        category: request.category,
        damage_type: request.damage_type,
        ward_absorbed,
    }
}
