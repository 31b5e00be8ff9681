//! Terminal and JSON rendering of match results.

use anyhow::{Context, Result};
use arena_core::combat::{ActionRecord, RoundPhase};
use arena_core::{Combatant, MatchOutcome, MatchResult, MatchSummary, PerSide, Side};
use console::style;
use serde::Serialize;

/// Output format shared by the subcommands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// Full JSON output
    Json,
}

/// JSON document for one match.
#[derive(Serialize)]
pub struct MatchReport<'a> {
    pub seed: u64,
    pub player: &'a str,
    pub opponent: &'a str,
    /// Hex SHA-256 over the round records.
    pub digest: String,
    pub final_hp: PerSide<f64>,
    pub summary: MatchSummary,
    pub result: &'a MatchResult,
}

impl<'a> MatchReport<'a> {
    pub fn new(seed: u64, result: &'a MatchResult, terminal: &'a PerSide<Combatant>) -> Self {
        Self {
            seed,
            player: &terminal.player.name,
            opponent: &terminal.opponent.name,
            digest: hex::encode(result.digest()),
            final_hp: PerSide::new(
                terminal.player.snapshot.current_hp,
                terminal.opponent.snapshot.current_hp,
            ),
            summary: result.summary(),
            result,
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub fn print_match(
    result: &MatchResult,
    terminal: &PerSide<Combatant>,
    seed: u64,
    show_rounds: bool,
) {
    let names = PerSide::new(terminal.player.name.as_str(), terminal.opponent.name.as_str());

    println!(
        "{} {} vs {}",
        style("Match:").bold().cyan(),
        style(names.player).bold(),
        style(names.opponent).bold()
    );
    println!("{} {}", style("Seed:").bold().cyan(), seed);
    println!(
        "{} {}",
        style("Digest:").bold().cyan(),
        hex::encode(result.digest())
    );
    println!();

    if show_rounds {
        println!("{}", style("=== Rounds ===").bold().green());
        for round in &result.rounds {
            let marker = match round.phase {
                RoundPhase::Normal => style("  ").dim(),
                RoundPhase::SuddenDeath => style("SD").red().bold(),
            };
            println!(
                "{} {:>2}  {} {:.1} / {} {:.1}",
                marker,
                round.round,
                names.player,
                round.hp.player,
                names.opponent,
                round.hp.opponent
            );
            for side in [Side::Player, Side::Opponent] {
                if let Some(action) = &round.actions[side] {
                    println!("      {}: {}", names[side], describe_action(action));
                }
            }
            for event in &round.events {
                println!("      {}", style(event).dim());
            }
        }
        println!();
    }

    println!("{}", style("=== Result ===").bold().green());
    let outcome = match result.outcome {
        MatchOutcome::PlayerVictory => style(format!("{} wins", names.player)).green().bold(),
        MatchOutcome::OpponentVictory => style(format!("{} wins", names.opponent)).red().bold(),
        MatchOutcome::DoubleKnockout => style("Double knockout".to_string()).yellow().bold(),
        MatchOutcome::Timeout => style("Timeout".to_string()).yellow().bold(),
    };
    println!("  {}", outcome);
    println!("  Rounds: {}", result.total_rounds);
    if result.was_sudden_death {
        println!(
            "  Sudden death: reached ({} stacks)",
            result.sudden_death_stacks
        );
    }
    println!();

    let summary = result.summary();
    println!("{}", style("=== Totals ===").bold().green());
    for side in [Side::Player, Side::Opponent] {
        let totals = &summary[side];
        println!("{}", style(names[side]).bold().yellow());
        println!("  Final HP: {:.1}", terminal[side].snapshot.current_hp);
        println!("  Damage dealt: {:.1}", totals.damage_dealt);
        println!(
            "  Hits: {}  Misses: {}  Crits: {}",
            totals.hits, totals.misses, totals.crits
        );
        println!(
            "  Blocks: {}  Ward absorbed: {:.1}",
            totals.blocks, totals.ward_absorbed
        );
        println!(
            "  DOT taken: {:.1}  Sudden death taken: {:.1}",
            totals.dot_damage_taken, totals.sudden_death_damage_taken
        );
    }
}

fn describe_action(action: &ActionRecord) -> String {
    if action.sub_hits.is_empty() {
        return action.label.clone();
    }
    if !action.hit {
        return format!("{} misses", action.label);
    }
    let mut text = format!("{} for {:.1}", action.label, action.damage);
    if action.sub_hits.len() > 1 {
        text.push_str(&format!(" ({} hits)", action.sub_hits.len()));
    }
    if action.crit {
        text.push_str(" crit");
    }
    if action.blocked {
        text.push_str(" blocked");
    }
    if action.ward_absorbed > 0.0 {
        text.push_str(&format!(" ward -{:.1}", action.ward_absorbed));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::combat::SubHitRecord;

    #[test]
    fn actions_are_described_compactly() {
        let mut action = ActionRecord::new("Cleave");
        action.push(SubHitRecord {
            hit: true,
            crit: true,
            damage: 12.5,
            ..SubHitRecord::default()
        });
        action.push(SubHitRecord {
            hit: true,
            damage: 4.0,
            ..SubHitRecord::default()
        });
        assert_eq!(describe_action(&action), "Cleave for 16.5 (2 hits) crit");

        let mut missed = ActionRecord::new("Basic Attack");
        missed.push(SubHitRecord::default());
        assert_eq!(describe_action(&missed), "Basic Attack misses");

        assert_eq!(describe_action(&ActionRecord::new("Shadow Step")), "Shadow Step");
    }
}
