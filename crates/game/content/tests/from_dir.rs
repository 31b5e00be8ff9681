use std::fs;
use std::path::Path;

use arena_content::{ContentFactory, ContentRegistry};
use arena_core::effects::EffectProblem;

const RACES: &str = "[(kind: Human, base_hp: 100.0, base_mana: 50.0)]";
const AFFIXES: &str = "[(kind: DamagePct, name: \"% Damage\", slots: [Weapon], tiers: [(min: 0.04, max: 0.07)])]";
const SKILLS: &str = r#"[
    (
        id: "Cleave",
        name: "Cleave",
        weapon: Some(TwoHandSword),
        multiplier: 1.35,
        mana_cost: 2.0,
        damage_type: Physical,
    ),
    (
        id: "Spark",
        name: "Spark",
        weapon: Some(Wand),
        multiplier: 1.1,
        damage_type: Lightning,
        effect: {"onHit": {"applyBleed": {"chance": "often"}}},
    ),
]"#;
const PASSIVES: &str = r#"[
    (id: "N01", name: "Core Start", tier: Minor, required_level: 1),
    (id: "N02", name: "Offense Path", tier: Minor, required_level: 1, prerequisites: ["N01"], effect: {"increasedDamage": 0.03}),
]"#;
const BUILD: &str = r#"(
    name: "Brute",
    race: Human,
    level: 4,
    passives: ["N01", "N02"],
    skill: Some("Cleave"),
)"#;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write data file");
}

fn data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "races.ron", RACES);
    write(dir.path(), "affixes.ron", AFFIXES);
    write(dir.path(), "skills.ron", SKILLS);
    write(dir.path(), "passives.ron", PASSIVES);
    fs::create_dir(dir.path().join("builds")).expect("builds dir");
    write(&dir.path().join("builds"), "brute.ron", BUILD);
    dir
}

#[test]
fn loads_a_directory_without_combat_toml() {
    let dir = data_dir();
    let registry = ContentRegistry::from_dir(dir.path()).expect("loads");

    assert_eq!(registry.config(), &arena_core::CombatConfig::default());
    assert_eq!(registry.skills().len(), 2);
    assert_eq!(registry.passives().len(), 2);

    let report = registry.report();
    assert_eq!(report.len(), 1);
    let spark = &report.diagnostics()[0];
    assert_eq!(spark.id, "Spark");
    assert_eq!(spark.diagnostic.path, "onHit.applyBleed.chance");
    assert!(matches!(spark.diagnostic.problem, EffectProblem::WrongType { .. }));
    // the bleed itself survives with its default chance
    assert_eq!(registry.skill("Spark").expect("loaded").effect.on_hit.len(), 1);
}

#[test]
fn combat_toml_overrides_defaults() {
    let dir = data_dir();
    write(dir.path(), "combat.toml", "[rounds]\nnormal_limit = 10\nabsolute_cap = 30\n");
    let registry = ContentRegistry::from_dir(dir.path()).expect("loads");

    assert_eq!(registry.config().rounds.normal_limit, 10);
    assert_eq!(registry.config().rounds.absolute_cap, 30);
    assert_eq!(registry.config().hit.max_chance, 0.95);
}

#[test]
fn builds_load_from_the_builds_directory() {
    let dir = data_dir();
    let registry = ContentRegistry::from_dir(dir.path()).expect("loads");
    let build = ContentFactory::new(dir.path())
        .load_build("brute")
        .expect("build file");

    let (combatant, issues) = registry.combatant(&build).expect("compiles");
    assert_eq!(combatant.name, "Brute");
    // Cleave needs a two-handed sword and the build is bare-handed.
    assert_eq!(issues.len(), 1);
    assert_eq!(combatant.skill.as_ref().map(|s| s.id.as_str()), Some("Cleave"));
}

#[test]
fn malformed_files_name_the_file() {
    let dir = data_dir();
    write(dir.path(), "skills.ron", "[(id: \"Broken\",");
    let err = ContentRegistry::from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("skill RON"), "{err}");

    let dir = data_dir();
    fs::remove_file(dir.path().join("passives.ron")).expect("remove");
    let err = ContentRegistry::from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("passives.ron"), "{err}");
}

#[test]
fn compile_fails_for_a_race_without_definition() {
    let dir = data_dir();
    let registry = ContentRegistry::from_dir(dir.path()).expect("loads");
    let mut build = ContentFactory::new(dir.path())
        .load_build("brute")
        .expect("build file");
    build.race = arena_core::RaceKind::Drakoid;

    let err = registry.combatant(&build).unwrap_err();
    assert!(err.to_string().contains("Drakoid"), "{err}");
}
