use arena_core::combat::{
    ActiveStatusEffect, DotTick, StatusEffects, StatusKind, armor_reduction, hit_chance,
    ward_absorption,
};
use arena_core::config::HitParams;
use arena_core::effects::NodeModifier;
use arena_core::stats::{AffixKind, EquippedItem, ItemBase, Resistances, RolledAffix};
use arena_core::{
    BuildRequest, CharacterSnapshot, CombatConfig, Combatant, Equipment, NodeTier,
    PassiveNodeSpec, RaceDefinition, RaceKind, StatCompiler, WeaponCategory, simulate_match,
};

fn races() -> Vec<RaceDefinition> {
    vec![
        RaceDefinition::new(RaceKind::Human, 100.0, 50.0, Resistances::default()),
        RaceDefinition::new(RaceKind::Dwarf, 120.0, 40.0, Resistances::default()),
        RaceDefinition::new(RaceKind::Orc, 110.0, 40.0, Resistances::default()),
        RaceDefinition::new(
            RaceKind::Undead,
            90.0,
            60.0,
            Resistances::new(0.0, 0.0, 0.0, 0.15),
        ),
        RaceDefinition::new(
            RaceKind::Drakoid,
            105.0,
            55.0,
            Resistances::new(0.1, 0.0, 0.0, 0.0),
        ),
    ]
}

fn compile(build: &BuildRequest) -> CharacterSnapshot {
    let config = CombatConfig::default();
    let races = races();
    StatCompiler::new(&config, &races)
        .compile(build)
        .expect("every race is defined")
}

fn shield(block_chance: f64, affixes: Vec<RolledAffix>) -> EquippedItem {
    EquippedItem {
        name: "Kite Shield".to_owned(),
        weapon: None,
        base: ItemBase {
            block_chance,
            armor: 20.0,
            ..ItemBase::default()
        },
        affixes,
    }
}

fn sword() -> EquippedItem {
    EquippedItem {
        name: "Arming Sword".to_owned(),
        weapon: Some(WeaponCategory::OneHandSword),
        base: ItemBase {
            damage: 12.0,
            attack_speed: 6.0,
            ..ItemBase::default()
        },
        affixes: vec![
            RolledAffix::new(AffixKind::CritChanceFlat, 0.9),
            RolledAffix::new(AffixKind::ResistAll, 2.0),
            RolledAffix::new(AffixKind::ResistCold, -4.0),
        ],
    }
}

fn node(modifiers: Vec<NodeModifier>) -> PassiveNodeSpec {
    PassiveNodeSpec {
        id: "Bulwark".to_owned(),
        name: "Bulwark".to_owned(),
        tier: NodeTier::Keystone,
        required_level: 1,
        prerequisites: Vec::new(),
        modifiers,
    }
}

fn loaded_build(race: RaceKind) -> BuildRequest {
    BuildRequest::new(race, 10).with_equipment(Equipment {
        weapon: Some(sword()),
        offhand: Some(shield(0.9, Vec::new())),
        ..Equipment::default()
    })
}

#[test]
fn compilation_is_deterministic() {
    for race in [
        RaceKind::Human,
        RaceKind::Dwarf,
        RaceKind::Orc,
        RaceKind::Undead,
        RaceKind::Drakoid,
    ] {
        let mut build = loaded_build(race);
        build.wounded = true;
        build.last_win_was_pvp = true;
        assert_eq!(compile(&build), compile(&build), "{race}");
    }
}

#[test]
fn caps_hold_after_compilation() {
    let snapshot = compile(&loaded_build(RaceKind::Human));
    assert!(snapshot.crit_chance <= 0.40);
    assert_eq!(snapshot.block_chance, 0.40);
    for resistance in snapshot.resistances.iter() {
        assert!((-0.5..=0.75).contains(&resistance), "{resistance}");
    }
    assert_eq!(snapshot.resistances.fire, 0.75);
    assert_eq!(snapshot.resistances.cold, -0.5);

    let bulwark = node(vec![NodeModifier::BlockCapBonus(0.05)]);
    let raised = compile(&loaded_build(RaceKind::Human).with_passives(vec![bulwark]));
    assert!((raised.block_chance - 0.45).abs() < 1e-12);
}

#[test]
fn mitigation_is_monotonic_and_below_one() {
    let mut previous = 0.0;
    for armor in [0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 5_000.0, 1e9] {
        let reduction = armor_reduction(armor, 100.0);
        assert!(reduction >= previous);
        assert!(reduction < 1.0);
        previous = reduction;
    }
}

#[test]
fn ward_never_absorbs_more_than_it_has_or_is_dealt() {
    for (ward, damage) in [(0.0, 10.0), (5.0, 10.0), (50.0, 10.0), (7.5, 0.0)] {
        let absorbed = ward_absorption(ward, damage);
        assert!(absorbed <= ward);
        assert!(absorbed <= damage);
    }
}

#[test]
fn stacks_and_refreshes_stay_bounded() {
    let mut effects = StatusEffects::new();
    for _ in 0..5 {
        effects.apply(
            ActiveStatusEffect::new(StatusKind::Poison, 2)
                .with_stacks(1, 3)
                .with_tick(DotTick::PercentOfCurrentHp(0.04)),
        );
    }
    let poison = effects.get(StatusKind::Poison).expect("poison applied");
    assert_eq!(effects.len(), 1);
    assert_eq!(poison.stacks, 3);
    assert!(poison.remaining_rounds <= poison.max_duration);
}

#[test]
fn high_accuracy_still_misses_sometimes() {
    assert_eq!(hit_chance(200.0, 0.0, &HitParams::default()), 0.95);
}

#[test]
fn summary_matches_round_records() {
    let config = CombatConfig::default();
    let player = Combatant::new("Player", 10, compile(&loaded_build(RaceKind::Orc)));
    let opponent = Combatant::new("Opponent", 10, compile(&loaded_build(RaceKind::Dwarf)));
    let result = simulate_match(player, opponent, 99, &config);
    let summary = result.summary();

    let dealt: f64 = result
        .rounds
        .iter()
        .filter_map(|round| round.actions.player.as_ref())
        .map(|action| action.damage)
        .sum();
    let hits: u32 = result
        .rounds
        .iter()
        .filter_map(|round| round.actions.player.as_ref())
        .flat_map(|action| action.sub_hits.iter())
        .filter(|sub_hit| sub_hit.hit)
        .count() as u32;
    assert!((summary.player.damage_dealt - dealt).abs() < 1e-9);
    assert_eq!(summary.player.hits, hits);
    assert_eq!(result.total_rounds as usize, result.rounds.len());
}

#[test]
fn zero_damage_builds_still_terminate() {
    let config = CombatConfig::default();
    let mut snapshot = compile(&BuildRequest::new(RaceKind::Dwarf, 1));
    snapshot.damage = Default::default();
    for seed in 0..8 {
        let result = simulate_match(
            Combatant::new("A", 1, snapshot.clone()),
            Combatant::new("B", 1, snapshot.clone()),
            seed,
            &config,
        );
        assert!(result.total_rounds <= config.rounds.absolute_cap);
        assert!(result.was_sudden_death);
    }
}
