//! The round loop.
//!
//! [`CombatOrchestrator`] owns both combatants for the duration of a match.
//! Each normal round ticks status effects, lets the faster side act and then
//! the slower one, and finally ticks cooldowns. After the normal round limit
//! the match enters sudden death, where both sides lose an escalating share
//! of their max HP each round until someone falls or the absolute cap is hit.

use crate::config::CombatConfig;
use crate::definitions::SkillSpec;
use crate::effects::{AdditiveStat, MultiplicativeStat, OnHitEffect};
use crate::env::{CombatRng, SeededRolls};
use crate::error::{ErrorSeverity, GameError};
use crate::stats::{BonusBundle, CharacterSnapshot, WeaponCategory};

use super::damage::ward_absorption;
use super::effects::{
    UseContext, UseReport, apply_on_hit, apply_on_use, consume_charges, spend_stun_turn,
    tick_status_effects,
};
use super::record::{
    ActionRecord, MatchOutcome, MatchResult, PerSide, RoundPhase, RoundRecord, Side, SubHitRecord,
};
use super::resolve::{AttackRequest, resolve_attack};
use super::status::StatusKind;
use super::DamageCategory;

const BASIC_ATTACK: &str = "Basic Attack";
const STUNNED: &str = "Stunned";

/// One side of a match.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub name: String,
    pub level: u32,
    pub snapshot: CharacterSnapshot,
    /// Equipped active skill, cast whenever it is usable.
    pub skill: Option<SkillSpec>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, level: u32, snapshot: CharacterSnapshot) -> Self {
        Self {
            name: name.into(),
            level,
            snapshot,
            skill: None,
        }
    }

    #[must_use]
    pub fn with_skill(mut self, skill: SkillSpec) -> Self {
        self.skill = Some(skill);
        self
    }
}

/// Why an equipped skill could not be cast this turn.
///
/// Always recovered by falling back to a basic attack.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ActionStateError {
    #[error("{skill} requires level {required} (level {level})")]
    SkillLevelLocked {
        skill: String,
        required: u32,
        level: u32,
    },

    #[error("{skill} requires a {required} weapon")]
    WeaponMismatch {
        skill: String,
        required: WeaponCategory,
        equipped: Option<WeaponCategory>,
    },

    #[error("{skill} is on cooldown ({remaining} rounds)")]
    OnCooldown { skill: String, remaining: u32 },

    #[error("{skill} costs {cost:.1} mana ({available:.1} available)")]
    InsufficientMana {
        skill: String,
        cost: f64,
        available: f64,
    },
}

impl GameError for ActionStateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SkillLevelLocked { .. } => "ACTION_SKILL_LEVEL_LOCKED",
            Self::WeaponMismatch { .. } => "ACTION_WEAPON_MISMATCH",
            Self::OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            Self::InsufficientMana { .. } => "ACTION_INSUFFICIENT_MANA",
        }
    }
}

impl ActionStateError {
    /// Gate failures that persist for the whole match and are worth an event line.
    pub fn is_gate(&self) -> bool {
        matches!(self, Self::SkillLevelLocked { .. } | Self::WeaponMismatch { .. })
    }
}

/// Per-match state of one side.
#[derive(Clone, Debug)]
struct Fighter {
    combatant: Combatant,
    cooldown: u32,
    casts: u32,
    first_hit_taken: bool,
    /// Multiplier armed by a successful block, spent on the next attack.
    riposte: Option<f64>,
}

impl Fighter {
    fn new(combatant: Combatant) -> Self {
        Self {
            combatant,
            cooldown: 0,
            casts: 0,
            first_hit_taken: false,
            riposte: None,
        }
    }

    /// Mana cost of the equipped skill if it can be cast now.
    fn castable(&self) -> Result<Option<f64>, ActionStateError> {
        let Some(skill) = self.combatant.skill.as_ref() else {
            return Ok(None);
        };
        let snapshot = &self.combatant.snapshot;

        if self.combatant.level < skill.required_level {
            return Err(ActionStateError::SkillLevelLocked {
                skill: skill.name.clone(),
                required: skill.required_level,
                level: self.combatant.level,
            });
        }
        if let Some(required) = skill.weapon
            && snapshot.weapon != Some(required)
        {
            return Err(ActionStateError::WeaponMismatch {
                skill: skill.name.clone(),
                required,
                equipped: snapshot.weapon,
            });
        }
        if self.cooldown > 0 {
            return Err(ActionStateError::OnCooldown {
                skill: skill.name.clone(),
                remaining: self.cooldown,
            });
        }

        let bonuses = &snapshot.bonuses;
        let mut cost = skill.mana_cost - bonuses.additive(AdditiveStat::ManaCostReduction);
        if self.casts == 0 {
            cost *= bonuses.factor(MultiplicativeStat::FirstSkillManaCostMult);
        }
        let cost = cost.max(0.0);
        if snapshot.current_mana < cost {
            return Err(ActionStateError::InsufficientMana {
                skill: skill.name.clone(),
                cost,
                available: snapshot.current_mana,
            });
        }
        Ok(Some(cost))
    }
}

/// Runs one match between two owned combatants.
pub struct CombatOrchestrator<'a> {
    config: &'a CombatConfig,
    fighters: PerSide<Fighter>,
    rounds: Vec<RoundRecord>,
}

impl<'a> CombatOrchestrator<'a> {
    pub fn new(player: Combatant, opponent: Combatant, config: &'a CombatConfig) -> Self {
        Self {
            config,
            fighters: PerSide::new(Fighter::new(player), Fighter::new(opponent)),
            rounds: Vec::new(),
        }
    }

    /// Side that acts first every round. Ties go to the player.
    pub fn first_mover(&self) -> Side {
        let player = self.fighters.player.combatant.snapshot.initiative;
        let opponent = self.fighters.opponent.combatant.snapshot.initiative;
        if opponent > player {
            Side::Opponent
        } else {
            Side::Player
        }
    }

    /// Plays the match to completion.
    ///
    /// Returns the result and both combatants in their terminal state.
    pub fn run(mut self, rng: &mut impl CombatRng) -> (MatchResult, PerSide<Combatant>) {
        let limits = self.config.rounds;
        let first = self.first_mover();
        let mut was_sudden_death = false;
        let mut sudden_death_stacks = 0;
        let mut round = 0;

        let outcome = loop {
            round += 1;
            let phase = if round > limits.normal_limit {
                RoundPhase::SuddenDeath
            } else {
                RoundPhase::Normal
            };
            let mut record = RoundRecord::new(round, phase);

            match phase {
                RoundPhase::Normal => self.normal_round(first, rng, &mut record),
                RoundPhase::SuddenDeath => {
                    was_sudden_death = true;
                    sudden_death_stacks = round - limits.normal_limit;
                    self.sudden_death(sudden_death_stacks, &mut record);
                }
            }

            record.hp = PerSide::new(
                self.fighters.player.combatant.snapshot.current_hp,
                self.fighters.opponent.combatant.snapshot.current_hp,
            );
            tracing::debug!(
                round,
                phase = %phase,
                player_hp = record.hp.player,
                opponent_hp = record.hp.opponent,
                "round complete"
            );
            self.rounds.push(record);

            let player_alive = self.fighters.player.combatant.snapshot.is_alive();
            let opponent_alive = self.fighters.opponent.combatant.snapshot.is_alive();
            match (player_alive, opponent_alive) {
                (true, false) => break MatchOutcome::PlayerVictory,
                (false, true) => break MatchOutcome::OpponentVictory,
                (false, false) => break MatchOutcome::DoubleKnockout,
                (true, true) if round >= limits.absolute_cap => break MatchOutcome::Timeout,
                (true, true) => {}
            }
        };

        tracing::debug!(%outcome, rounds = round, was_sudden_death, "match finished");

        let result = MatchResult {
            outcome,
            victory: outcome == MatchOutcome::PlayerVictory,
            total_rounds: round,
            was_sudden_death,
            sudden_death_stacks,
            rounds: self.rounds,
        };
        (result, self.fighters.map(|fighter| fighter.combatant))
    }

    fn both_alive(&self) -> bool {
        self.fighters.player.combatant.snapshot.is_alive()
            && self.fighters.opponent.combatant.snapshot.is_alive()
    }

    fn normal_round(&mut self, first: Side, rng: &mut impl CombatRng, record: &mut RoundRecord) {
        // 1. status ticks
        for side in [Side::Player, Side::Opponent] {
            let fighter = &mut self.fighters[side];
            let snapshot = &mut fighter.combatant.snapshot;
            let tick = tick_status_effects(snapshot);
            let dealt = snapshot.take_damage(tick.damage);
            record.dot_damage[side] = dealt;
            record.events.extend(
                tick.events
                    .into_iter()
                    .map(|event| format!("{}: {event}", fighter.combatant.name)),
            );
        }
        if !self.both_alive() {
            return;
        }

        // 2. actions
        for (side, acting_first) in [(first, true), (first.other(), false)] {
            self.act(side, acting_first, rng, record);
            if !self.both_alive() {
                return;
            }
        }

        // 3. cooldowns
        for side in [Side::Player, Side::Opponent] {
            let fighter = &mut self.fighters[side];
            fighter.cooldown = fighter.cooldown.saturating_sub(1);
        }
    }

    fn sudden_death(&mut self, stacks: u32, record: &mut RoundRecord) {
        let ratio = self.config.rounds.sudden_death_ratio * f64::from(stacks);
        for side in [Side::Player, Side::Opponent] {
            let snapshot = &mut self.fighters[side].combatant.snapshot;
            let damage = snapshot.take_damage(snapshot.max_hp * ratio);
            record.sudden_death_damage[side] = damage;
        }
        record.events.push(format!("Sudden death ×{stacks}"));
    }

    fn act(
        &mut self,
        side: Side,
        acting_first: bool,
        rng: &mut impl CombatRng,
        record: &mut RoundRecord,
    ) {
        let config = self.config;
        let (actor, target) = self.fighters.pair_mut(side);

        if actor.combatant.snapshot.status.stun_turns() > 0 {
            let left = spend_stun_turn(&mut actor.combatant.snapshot);
            record.events.push(format!(
                "{} is stunned and skips ({left} turns left)",
                actor.combatant.name
            ));
            record.actions[side] = Some(ActionRecord::new(STUNNED));
            return;
        }

        let cost = match actor.castable() {
            Ok(cost) => cost,
            Err(error) => {
                tracing::debug!(
                    side = %side,
                    code = error.error_code(),
                    %error,
                    "skill unavailable, basic attack"
                );
                if error.is_gate() {
                    record
                        .events
                        .push(format!("{}: {error}", actor.combatant.name));
                }
                None
            }
        };

        let Fighter {
            combatant,
            cooldown,
            casts,
            riposte,
            ..
        } = actor;
        let attacker = &mut combatant.snapshot;
        let category = attacker
            .weapon
            .map_or(DamageCategory::Melee, WeaponCategory::damage_category);

        let mut action = ActionRecord::new(BASIC_ATTACK);
        let mut request = AttackRequest::basic(category);
        let mut use_report = UseReport::default();
        let mut skill_used = None;

        if let (Some(cost), Some(skill)) = (cost, combatant.skill.as_ref()) {
            attacker.current_mana -= cost;
            *cooldown = attacker
                .bonuses
                .effective_cooldown(skill.cooldown, &config.effects);
            *casts += 1;

            use_report = apply_on_use(
                attacker,
                &target.combatant.snapshot,
                &skill.effect.on_use,
                UseContext { acting_first },
                config,
            );
            record
                .events
                .push(format!("{} uses {}", combatant.name, skill.name));
            record.events.extend(use_report.events.drain(..));
            action.label = skill.name.clone();

            if !skill.is_attack() {
                record.actions[side] = Some(action);
                return;
            }

            let mut multiplier = skill.multiplier;
            if attacker.wields_two_handed_sword() {
                multiplier += attacker
                    .bonuses
                    .additive(AdditiveStat::ActiveSkillMultBonus);
            }
            request = AttackRequest::new(skill.damage_category(), skill.damage_type, multiplier);
            skill_used = Some(skill);
        }

        // Action-wide multiplier
        let defender = &target.combatant.snapshot;
        let bonuses = &attacker.bonuses;
        let mut action_mult = use_report.damage_mult;
        if acting_first {
            action_mult *= bonuses.factor(MultiplicativeStat::FirstStrikeDamageMult);
        }
        if defender.hp_ratio() < bonuses.execution_threshold(&config.effects) {
            action_mult *= bonuses.factor(MultiplicativeStat::ExecutionWindowMult);
        }
        if let Some(bonus) = skill_used.and_then(|skill| skill.effect.marked_bonus())
            && defender.status.has(StatusKind::Mark)
        {
            action_mult *= bonus;
        }
        if let Some(mult) = riposte.take() {
            action_mult *= mult;
            record
                .events
                .push(format!("{} ripostes ×{mult:.2}", combatant.name));
        }
        request.multiplier *= action_mult;
        let request = request.with_use_report(&use_report);

        let (hits, each_hit, on_hit) = match skill_used {
            Some(skill) => (
                skill.effect.hits(),
                skill.effect.each_hit_multiplier(),
                skill.effect.on_hit.as_slice(),
            ),
            None => (1, 1.0, [].as_slice()),
        };
        let sub_request = AttackRequest {
            multiplier: request.multiplier * each_hit,
            ..request
        };

        for _ in 0..hits {
            let sub_hit = strike(
                attacker,
                target,
                &sub_request,
                on_hit,
                rng,
                config,
                &mut record.events,
            );
            action.push(sub_hit);
            if !target.combatant.snapshot.is_alive() {
                break;
            }
        }

        record.actions[side] = Some(action);
    }
}

/// One attack resolution with every post-hit adjustment applied.
fn strike(
    attacker: &mut CharacterSnapshot,
    target: &mut Fighter,
    request: &AttackRequest,
    on_hit: &[OnHitEffect],
    rng: &mut impl CombatRng,
    config: &CombatConfig,
    events: &mut Vec<String>,
) -> SubHitRecord {
    let defender_bonuses = target.combatant.snapshot.bonuses.clone();
    let pre_hit_ratio = target.combatant.snapshot.hp_ratio();

    let outcome = resolve_attack(attacker, &target.combatant.snapshot, request, rng, config);
    let mut sub_hit = SubHitRecord {
        hit: outcome.hit,
        crit: outcome.crit,
        blocked: outcome.blocked,
        ..SubHitRecord::default()
    };
    if !outcome.hit {
        return sub_hit;
    }

    let defender = &mut target.combatant.snapshot;
    let mut damage = outcome.damage;

    // Attacker-side multipliers
    if defender.status.has(StatusKind::Mark) {
        damage *= defender.status.mark_multiplier()
            * attacker.bonuses.factor(MultiplicativeStat::DamageVsMarkedMult);
    }
    if defender.status.stun_turns() > 0 {
        damage *= attacker.bonuses.factor(MultiplicativeStat::StunDamageTakenMult);
    }
    damage *= consume_charges(attacker);

    // Defender-side multipliers
    if damage > 0.0 && !target.first_hit_taken {
        target.first_hit_taken = true;
        damage *= defender_bonuses.factor(MultiplicativeStat::FirstHitDamageTakenMult);
    }
    if pre_hit_ratio < defender_bonuses.low_hp_threshold(&config.effects) {
        damage *= defender_bonuses.factor(MultiplicativeStat::LowHpDamageTakenMult);
    }
    if outcome.blocked {
        damage *= defender_bonuses.factor(MultiplicativeStat::BlockSuccessDamageTakenMult);
        arm_riposte(target, &defender_bonuses);
    }
    let defender = &mut target.combatant.snapshot;

    let effects = apply_on_hit(attacker, defender, on_hit, rng, config);
    events.extend(effects.events);

    let absorbed = if outcome.damage_type.is_physical() {
        0.0
    } else {
        ward_absorption(defender.ward, damage)
    };
    defender.consume_ward(absorbed);
    let dealt = defender.take_damage(damage - absorbed);
    sub_hit.ward_absorbed += absorbed;
    sub_hit.damage += dealt;

    if dealt > 0.0 && attacker.lifesteal > 0.0 {
        let healed = attacker.heal(dealt * attacker.lifesteal);
        if healed > 0.0 {
            events.push(format!("Lifesteal +{healed:.1}"));
        }
    }

    // Flat elemental add-ons land as a separate, armor-free hit.
    let crit_mult = if outcome.crit {
        attacker.crit_multiplier
    } else {
        1.0
    };
    let mut elemental = 0.0;
    for (damage_type, amount) in attacker.flat_elemental.iter() {
        let mitigated = (amount * crit_mult * (1.0 - defender.resistance(damage_type))).max(0.0);
        let absorbed = ward_absorption(defender.ward, mitigated);
        defender.consume_ward(absorbed);
        sub_hit.ward_absorbed += absorbed;
        elemental += defender.take_damage(mitigated - absorbed);
    }
    if elemental > 0.0 {
        sub_hit.damage += elemental;
        events.push(format!("Elemental -{elemental:.1}"));
    }

    tracing::trace!(
        crit = outcome.crit,
        blocked = outcome.blocked,
        damage = sub_hit.damage,
        ward_absorbed = sub_hit.ward_absorbed,
        target_hp = defender.current_hp,
        "sub-hit applied"
    );

    sub_hit
}

fn arm_riposte(defender: &mut Fighter, bonuses: &BonusBundle) {
    let stance_bonus = defender
        .combatant
        .snapshot
        .status
        .get(StatusKind::CounterStance)
        .map_or(0.0, |stance| stance.payload.riposte_bonus);
    let mult = bonuses.factor(MultiplicativeStat::RiposteAfterBlockMult) * (1.0 + stance_bonus);
    if mult > 1.0 {
        defender.riposte = Some(mult);
    }
}

/// Runs a match with rolls seeded from `seed`.
pub fn simulate_match(
    player: Combatant,
    opponent: Combatant,
    seed: u64,
    config: &CombatConfig,
) -> MatchResult {
    let mut rolls = SeededRolls::new(seed);
    let (result, _) = CombatOrchestrator::new(player, opponent, config).run(&mut rolls);
    result
}
