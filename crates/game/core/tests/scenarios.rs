use arena_core::combat::{MatchOutcome, RoundPhase};
use arena_core::effects::{
    Application, DotKind, EffectProblem, MultiHit, OnHitEffect, RawValue, SkillEffectSpec,
    parse_skill_effect, raw_map,
};
use arena_core::stats::{EquippedItem, ItemBase, Resistances};
use arena_core::{
    BuildRequest, CharacterSnapshot, CombatConfig, CombatOrchestrator, Combatant, CreatureBlock,
    DamageType, Equipment, FixedRolls, RaceDefinition, RaceKind, RollKind, SeededRolls, SkillSpec,
    StatCompiler, WeaponCategory, simulate_match,
};

fn fighter(name: &str, race: RaceKind) -> Combatant {
    let config = CombatConfig::default();
    let races = vec![
        RaceDefinition::new(RaceKind::Human, 100.0, 50.0, Resistances::default()),
        RaceDefinition::new(RaceKind::Dwarf, 120.0, 40.0, Resistances::default()),
    ];
    let build = BuildRequest::new(race, 5).with_equipment(Equipment {
        weapon: Some(EquippedItem {
            name: "Arming Sword".to_owned(),
            weapon: Some(WeaponCategory::OneHandSword),
            base: ItemBase {
                damage: 10.0,
                attack_speed: 6.0,
                ..ItemBase::default()
            },
            affixes: Vec::new(),
        }),
        ..Equipment::default()
    });
    let snapshot = StatCompiler::new(&config, &races)
        .compile(&build)
        .expect("race is defined");
    Combatant::new(name, 5, snapshot)
}

fn sword_skill(name: &str, cooldown: u32, effect: SkillEffectSpec) -> SkillSpec {
    SkillSpec {
        id: name.replace(' ', ""),
        name: name.to_owned(),
        weapon: Some(WeaponCategory::OneHandSword),
        multiplier: 1.0,
        mana_cost: 10.0,
        cooldown,
        required_level: 1,
        damage_type: DamageType::Physical,
        effect,
    }
}

/// Every attack lands, nothing crits or is blocked, every effect procs.
fn pinned() -> FixedRolls {
    FixedRolls::always()
        .with(RollKind::Crit, 0.99)
        .with(RollKind::Block, 0.99)
}

#[test]
fn same_seed_replays_the_same_match() {
    let config = CombatConfig::default();
    let a = simulate_match(
        fighter("A", RaceKind::Human),
        fighter("B", RaceKind::Dwarf),
        2024,
        &config,
    );
    let b = simulate_match(
        fighter("A", RaceKind::Human),
        fighter("B", RaceKind::Dwarf),
        2024,
        &config,
    );
    assert_eq!(a, b);
}

#[cfg(feature = "serde")]
#[test]
fn digest_follows_the_seed() {
    let config = CombatConfig::default();
    let digest = |seed| {
        simulate_match(
            fighter("A", RaceKind::Human),
            fighter("B", RaceKind::Dwarf),
            seed,
            &config,
        )
        .digest()
    };
    assert_eq!(hex::encode(digest(11)), hex::encode(digest(11)));
    assert_ne!(digest(11), digest(12));
}

#[test]
fn bleed_ticks_flat_each_round() {
    let config = CombatConfig::default();
    let rend = SkillEffectSpec {
        on_hit: vec![OnHitEffect::Dot {
            kind: DotKind::Bleed,
            apply: Application {
                duration: Some(3),
                ..Application::default()
            },
            tick_percent: None,
        }],
        ..SkillEffectSpec::default()
    };
    let player = fighter("A", RaceKind::Human).with_skill(sword_skill("Rend", 10, rend));
    let opponent = fighter("B", RaceKind::Human);
    let (result, _) = CombatOrchestrator::new(player, opponent, &config).run(&mut pinned());

    // weapon base 10 * 0.25, through no armor at all
    let ticks: Vec<f64> = result
        .rounds
        .iter()
        .take(5)
        .map(|round| round.dot_damage.opponent)
        .collect();
    assert_eq!(ticks, [0.0, 2.5, 2.5, 2.5, 0.0]);
    assert!(result.rounds.iter().all(|r| r.dot_damage.player == 0.0));
}

#[test]
fn sudden_death_escalates() {
    let config = CombatConfig::default();
    let mut a = fighter("A", RaceKind::Dwarf);
    let mut b = fighter("B", RaceKind::Dwarf);
    a.snapshot.damage = Default::default();
    b.snapshot.damage = Default::default();
    let result = simulate_match(a, b, 5, &config);

    assert!(result.was_sudden_death);
    assert!(result.sudden_death_stacks > 0);
    let burns: Vec<f64> = result
        .rounds
        .iter()
        .filter(|round| round.phase == RoundPhase::SuddenDeath)
        .map(|round| round.sudden_death_damage.player)
        .collect();
    assert_eq!(result.rounds[15].round, 16);
    // the final round may be capped by remaining HP
    for pair in burns[..burns.len() - 1].windows(2) {
        assert!(pair[1] > pair[0], "{burns:?}");
    }
}

#[test]
fn stun_skips_only_the_stunned_turn() {
    let config = CombatConfig::default();
    let bash = SkillEffectSpec {
        on_hit: vec![OnHitEffect::Stun(Application::default())],
        ..SkillEffectSpec::default()
    };
    let player = fighter("A", RaceKind::Human).with_skill(sword_skill("Shield Bash", 10, bash));
    let opponent = fighter("B", RaceKind::Human);
    let (result, _) = CombatOrchestrator::new(player, opponent, &config).run(&mut pinned());

    let labels: Vec<&str> = result
        .rounds
        .iter()
        .take(3)
        .filter_map(|round| round.actions.opponent.as_ref())
        .map(|action| action.label.as_str())
        .collect();
    assert_eq!(labels, ["Stunned", "Basic Attack", "Basic Attack"]);
    assert_eq!(
        result.rounds[0].actions.player.as_ref().map(|a| a.label.as_str()),
        Some("Shield Bash")
    );
}

#[test]
fn multi_hit_stops_when_the_target_falls() {
    let config = CombatConfig::default();
    let flurry = SkillEffectSpec {
        multi_hit: Some(MultiHit {
            hits: 5,
            each_hit_multi: 1.0,
        }),
        ..SkillEffectSpec::default()
    };
    let player = fighter("A", RaceKind::Human).with_skill(sword_skill("Flurry", 3, flurry));
    let mut opponent = fighter("B", RaceKind::Human);
    opponent.snapshot.current_hp = 30.0;
    let (result, terminal) =
        CombatOrchestrator::new(player, opponent, &config).run(&mut pinned());

    assert_eq!(result.outcome, MatchOutcome::PlayerVictory);
    assert!(result.victory);
    let action = result.rounds[0].actions.player.as_ref().expect("player acted");
    assert!(action.sub_hits.len() < 5);
    assert_eq!(terminal.opponent.snapshot.current_hp, 0.0);
}

#[test]
fn unknown_effect_keys_do_not_block_known_ones() {
    let raw = raw_map([(
        "onHit",
        RawValue::Map(raw_map([
            ("applyBleed", RawValue::Map(raw_map([("chance", 1.0)]))),
            ("applyFrostbite", RawValue::Map(raw_map([("chance", 1.0)]))),
        ])),
    )]);
    let parsed = parse_skill_effect(&raw);

    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].problem, EffectProblem::UnknownKey);
    assert!(parsed.value.on_hit.iter().any(|effect| matches!(
        effect,
        OnHitEffect::Dot {
            kind: DotKind::Bleed,
            ..
        }
    )));
}

#[test]
fn creatures_fight_compiled_characters() {
    let config = CombatConfig::default();
    for turn in [1, 5, 9, 15] {
        let mut rolls = SeededRolls::new(u64::from(turn));
        let creature = CreatureBlock::for_turn(turn, &mut rolls);
        let name = creature.name.clone();
        let opponent: CharacterSnapshot = creature.into_snapshot(&config);
        let player = fighter("Hero", RaceKind::Human);
        let creature = Combatant::new(name, turn, opponent);
        let (result, _) = CombatOrchestrator::new(player, creature, &config).run(&mut rolls);
        assert!(result.total_rounds <= config.rounds.absolute_cap);
    }
}
