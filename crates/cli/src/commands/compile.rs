//! Compile a build and print its snapshot.

use anyhow::Result;
use arena_core::{CharacterSnapshot, GameError};
use clap::Parser;
use console::style;
use serde::Serialize;

use crate::config::CliConfig;
use crate::render::{self, OutputFormat};
use crate::session::Session;

/// Compile a build and print its snapshot
#[derive(Parser, Debug)]
pub struct Compile {
    /// Build: a built-in name, a build in the data directory, or a RON file
    #[arg(value_name = "BUILD")]
    build: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct IssueLine {
    severity: &'static str,
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct CompileReport<'a> {
    name: &'a str,
    level: u32,
    skill: Option<&'a str>,
    issues: Vec<IssueLine>,
    snapshot: &'a CharacterSnapshot,
}

impl Compile {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let session = Session::open(config)?;
        let (combatant, issues) = session.combatant(&self.build)?;
        let issues: Vec<IssueLine> = issues
            .iter()
            .map(|issue| IssueLine {
                severity: issue.severity().as_str(),
                code: issue.error_code(),
                message: issue.to_string(),
            })
            .collect();

        match self.format {
            OutputFormat::Json => render::print_json(&CompileReport {
                name: &combatant.name,
                level: combatant.level,
                skill: combatant.skill.as_ref().map(|skill| skill.id.as_str()),
                issues,
                snapshot: &combatant.snapshot,
            })?,
            OutputFormat::Summary => {
                println!(
                    "{} {} (level {})",
                    style("Build:").bold().cyan(),
                    style(&combatant.name).bold(),
                    combatant.level
                );
                if let Some(skill) = &combatant.skill {
                    println!("{} {}", style("Skill:").bold().cyan(), skill.name);
                }
                println!();
                print_snapshot(&combatant.snapshot);
                if !issues.is_empty() {
                    println!();
                    println!("{}", style("=== Issues ===").bold().yellow());
                    for issue in &issues {
                        println!("  {} {}", style(issue.code).dim(), issue.message);
                    }
                }
            }
        }
        Ok(())
    }
}

fn print_snapshot(snapshot: &CharacterSnapshot) {
    let attributes = &snapshot.attributes;
    println!("{}", style("=== Attributes ===").bold().green());
    println!(
        "  STR {}  DEX {}  AGI {}  INT {}  VIT {}  WIS {}  LUK {}",
        attributes.strength,
        attributes.dexterity,
        attributes.agility,
        attributes.intelligence,
        attributes.vitality,
        attributes.wisdom,
        attributes.luck
    );
    println!();

    println!("{}", style("=== Offense ===").bold().green());
    match snapshot.weapon {
        Some(weapon) => println!("  Weapon: {}", weapon),
        None => println!("  Weapon: bare hands"),
    }
    println!(
        "  Damage: melee {:.1}  ranged {:.1}  spell {:.1}",
        snapshot.damage.melee, snapshot.damage.ranged, snapshot.damage.spell
    );
    println!("  Accuracy: {:.1}", snapshot.accuracy);
    println!(
        "  Crit: {:.1}% x{:.2}",
        snapshot.crit_chance * 100.0,
        snapshot.crit_multiplier
    );
    println!("  Initiative: {:.1}", snapshot.initiative);
    println!();

    println!("{}", style("=== Defense ===").bold().green());
    println!("  HP: {:.1}  Mana: {:.1}", snapshot.max_hp, snapshot.max_mana);
    println!(
        "  Armor: {:.1}  Evasion: {:.1}  Ward: {:.1}",
        snapshot.armor, snapshot.evasion, snapshot.ward
    );
    println!(
        "  Block: {:.1}% (cap {:.1}%, reduces {:.0}%)",
        snapshot.block_chance * 100.0,
        snapshot.block_chance_cap * 100.0,
        snapshot.block_reduction * 100.0
    );
    let resist = &snapshot.resistances;
    println!(
        "  Resist: fire {:.0}%  cold {:.0}%  lightning {:.0}%  chaos {:.0}%",
        resist.fire * 100.0,
        resist.cold * 100.0,
        resist.lightning * 100.0,
        resist.chaos * 100.0
    );
}
