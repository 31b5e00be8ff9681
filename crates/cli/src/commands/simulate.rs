//! Play one seeded match between two builds.

use anyhow::Result;
use arena_core::{CombatOrchestrator, SeededRolls};
use clap::Parser;

use crate::config::CliConfig;
use crate::render::{self, MatchReport, OutputFormat};
use crate::session::Session;

/// Play one match between two builds
#[derive(Parser, Debug)]
pub struct Simulate {
    /// Player build: a built-in name, a build in the data directory, or a RON file
    #[arg(value_name = "PLAYER")]
    player: String,

    /// Opponent build, resolved like the player
    #[arg(value_name = "OPPONENT")]
    opponent: String,

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

impl Simulate {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let session = Session::open(config)?;
        let (player, _) = session.combatant(&self.player)?;
        let (opponent, _) = session.combatant(&self.opponent)?;
        let seed = config.seed_or(self.seed);

        tracing::info!(
            seed,
            player = %player.name,
            opponent = %opponent.name,
            "simulating match"
        );
        let (result, terminal) = CombatOrchestrator::new(player, opponent, session.config())
            .run(&mut SeededRolls::new(seed));
        tracing::info!(
            outcome = %result.outcome,
            rounds = result.total_rounds,
            "match finished"
        );

        match self.format {
            OutputFormat::Summary => render::print_match(&result, &terminal, seed, self.rounds),
            OutputFormat::Json => render::print_json(&MatchReport::new(seed, &result, &terminal))?,
        }
        Ok(())
    }
}
