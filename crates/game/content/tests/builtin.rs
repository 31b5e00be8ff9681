use arena_content::{BUILTIN_BUILDS, BuildLoader, ContentRegistry, DefinitionKind};
use arena_core::effects::{EffectProblem, MultiHit, OnUseEffect, StanceKind};
use arena_core::{
    CombatOrchestrator, DamageType, MatchOutcome, NodeTier, RaceKind, RaceOracle, SeededRolls,
    WeaponCategory, simulate_match,
};

fn registry() -> ContentRegistry {
    ContentRegistry::builtin().expect("built-in content loads")
}

#[test]
fn builtin_content_is_complete() {
    let registry = registry();

    assert_eq!(registry.races().len(), 5);
    assert_eq!(registry.affixes().len(), 22);
    assert_eq!(registry.skills().len(), 30);
    assert_eq!(registry.passives().len(), 60);
    for kind in [
        RaceKind::Human,
        RaceKind::Dwarf,
        RaceKind::Orc,
        RaceKind::Undead,
        RaceKind::Drakoid,
    ] {
        assert!(registry.race(kind).is_some(), "{kind}");
    }
    for weapon in [
        WeaponCategory::Bow,
        WeaponCategory::Dagger,
        WeaponCategory::OneHandSword,
        WeaponCategory::TwoHandSword,
        WeaponCategory::Wand,
        WeaponCategory::Staff,
    ] {
        let count = registry
            .skills()
            .iter()
            .filter(|skill| skill.weapon == Some(weapon))
            .count();
        assert_eq!(count, 5, "{weapon}");
    }
    let keystones = registry
        .passives()
        .iter()
        .filter(|node| node.tier == NodeTier::Keystone)
        .count();
    assert_eq!(keystones, 6);
}

#[test]
fn builtin_diagnostics_name_their_nodes() {
    let registry = registry();
    let report = registry.report();

    assert_eq!(report.len(), 2, "{:?}", report.diagnostics());
    let assassin: Vec<_> = report.for_id("N33").collect();
    assert_eq!(assassin.len(), 1);
    assert_eq!(assassin[0].kind, DefinitionKind::Passive);
    assert_eq!(assassin[0].diagnostic.path, "firstCritMultiBonus");
    assert_eq!(assassin[0].diagnostic.problem, EffectProblem::UnknownKey);

    let burn_expert: Vec<_> = report.for_id("N58").collect();
    assert_eq!(burn_expert[0].diagnostic.path, "globalCap");

    // the remaining key of each node still applies
    assert_eq!(registry.passive("N33").expect("defined").modifiers.len(), 1);
    assert_eq!(registry.passive("N58").expect("defined").modifiers.len(), 1);
}

#[test]
fn skill_documents_are_parsed() {
    let registry = registry();

    let counter = registry.skill("CounterMove").expect("defined");
    assert!(matches!(
        counter.effect.on_use.as_slice(),
        [OnUseEffect::Stance(stance)] if stance.kind == StanceKind::CounterStance
            && (stance.bonuses.riposte_bonus - 0.20).abs() < 1e-12
    ));

    let chain = registry.skill("ChainLightning").expect("defined");
    assert_eq!(chain.damage_type, DamageType::Lightning);
    assert_eq!(
        chain.effect.multi_hit,
        Some(MultiHit {
            hits: 2,
            each_hit_multi: 1.0
        })
    );

    let shadow_step = registry.skill("ShadowStep").expect("defined");
    assert!(!shadow_step.is_attack());
}

#[test]
fn builtin_builds_resolve_without_issues() {
    let registry = registry();
    for (name, _) in BUILTIN_BUILDS {
        let build = BuildLoader::builtin(name).expect("parses");
        let resolved = registry.resolve_build(&build).expect("ids resolve");
        assert!(resolved.issues.is_empty(), "{name}: {:?}", resolved.issues);

        let (combatant, _) = registry.combatant(&build).expect("compiles");
        assert_eq!(combatant.snapshot.current_hp, combatant.snapshot.max_hp);
        assert!(combatant.skill.is_some());
    }
}

#[test]
fn unknown_ids_fail_resolution() {
    let registry = registry();
    let mut build = BuildLoader::builtin("duelist").expect("parses");
    build.skill = Some("Fireworks".to_owned());
    let err = registry.resolve_build(&build).unwrap_err();
    assert!(err.to_string().contains("Fireworks"));

    let mut build = BuildLoader::builtin("duelist").expect("parses");
    build.passives.push("N99".to_owned());
    assert!(registry.resolve_build(&build).is_err());
}

#[test]
fn off_table_builds_report_issues_and_still_compile() {
    let registry = registry();
    let mut build = BuildLoader::builtin("duelist").expect("parses");
    build.level = 3;
    // Cross Strike needs level 7; the 1H passives past N34 need level 5+.
    build.passives.push("N40".to_owned());
    let (combatant, issues) = registry.combatant(&build).expect("issues are not fatal");

    assert!(!issues.is_empty());
    assert!(issues.iter().any(|issue| issue.to_string().contains("CrossStrike")));
    assert!(issues.iter().any(|issue| issue.to_string().contains("N39")));
    assert_eq!(combatant.level, 3);
}

#[test]
fn builtin_builds_fight_to_a_result() {
    let registry = registry();
    let config = registry.config();
    let (duelist, _) = registry
        .combatant(&BuildLoader::builtin("duelist").expect("parses"))
        .expect("compiles");
    let (berserker, _) = registry
        .combatant(&BuildLoader::builtin("berserker").expect("parses"))
        .expect("compiles");

    let first = simulate_match(duelist.clone(), berserker.clone(), 7, config);
    let second = simulate_match(duelist.clone(), berserker.clone(), 7, config);
    assert_eq!(first, second);
    assert!(first.total_rounds <= config.rounds.absolute_cap);

    let (result, terminal) =
        CombatOrchestrator::new(duelist, berserker, config).run(&mut SeededRolls::new(7));
    assert_eq!(result, first);
    match result.outcome {
        MatchOutcome::PlayerVictory => assert!(terminal.player.snapshot.current_hp > 0.0),
        MatchOutcome::OpponentVictory => assert!(terminal.opponent.snapshot.current_hp > 0.0),
        MatchOutcome::DoubleKnockout | MatchOutcome::Timeout => {}
    }
}
