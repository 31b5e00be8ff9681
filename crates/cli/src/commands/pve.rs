//! Fight the generated creature of an encounter turn.

use anyhow::Result;
use arena_core::{CombatOrchestrator, Combatant, CreatureBlock, SeededRolls};
use clap::Parser;
use console::style;

use crate::config::CliConfig;
use crate::render::{self, MatchReport, OutputFormat};
use crate::session::Session;

/// Fight the generated creature of an encounter turn
#[derive(Parser, Debug)]
pub struct Pve {
    /// Player build: a built-in name, a build in the data directory, or a RON file
    #[arg(value_name = "BUILD")]
    build: String,

    /// Encounter turn; sets the creature's name and strength
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    turn: u32,

    /// Match seed (defaults to ARENA_SEED, then 0)
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Print every round
    #[arg(short, long)]
    rounds: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Pve {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let session = Session::open(config)?;
        let (player, _) = session.combatant(&self.build)?;
        let seed = config.seed_or(self.seed);

        // The creature's variance roll is the first sample of the match stream.
        let mut rng = SeededRolls::new(seed);
        let creature = CreatureBlock::for_turn(self.turn, &mut rng);
        if matches!(self.format, OutputFormat::Summary) {
            print_creature(&creature);
        }
        let opponent = Combatant::new(
            creature.name.clone(),
            self.turn,
            creature.into_snapshot(session.config()),
        );

        tracing::info!(seed, turn = self.turn, player = %player.name, "simulating encounter");
        let (result, terminal) =
            CombatOrchestrator::new(player, opponent, session.config()).run(&mut rng);

        match self.format {
            OutputFormat::Summary => render::print_match(&result, &terminal, seed, self.rounds),
            OutputFormat::Json => render::print_json(&MatchReport::new(seed, &result, &terminal))?,
        }
        Ok(())
    }
}

fn print_creature(creature: &CreatureBlock) {
    println!(
        "{} {} (turn {}, difficulty {:.2})",
        style("Creature:").bold().cyan(),
        style(&creature.name).bold(),
        creature.turn,
        CreatureBlock::difficulty(creature.turn)
    );
    println!(
        "  HP {:.0}  Damage {:.0}  Armor {:.0}  Evasion {:.1}  Accuracy {:.0}",
        creature.max_hp, creature.damage, creature.armor, creature.evasion, creature.accuracy
    );
    println!();
}
