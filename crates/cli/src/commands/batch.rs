//! Play many seeded matches in parallel.
//!
//! Match `i` of a batch with base seed `b` is seeded with
//! `compute_seed(b, i, 0)`, so a batch's totals do not depend on how many
//! worker threads play it.

use anyhow::{Context, Result};
use arena_core::{CombatConfig, Combatant, MatchOutcome, MatchResult, compute_seed, simulate_match};
use clap::Parser;
use console::style;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::CliConfig;
use crate::render::{self, OutputFormat};
use crate::session::Session;

/// Play many seeded matches in parallel and report rates
#[derive(Parser, Debug)]
pub struct Batch {
    /// Player build: a built-in name, a build in the data directory, or a RON file
    #[arg(value_name = "PLAYER")]
    player: String,

    /// Opponent build, resolved like the player
    #[arg(value_name = "OPPONENT")]
    opponent: String,

    /// Number of matches
    #[arg(short = 'n', long, default_value_t = 1000)]
    matches: u64,

    /// Base seed (defaults to ARENA_SEED, then 0)
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Worker threads (defaults to ARENA_THREADS, then one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Batch {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let session = Session::open(config)?;
        let (player, _) = session.combatant(&self.player)?;
        let (opponent, _) = session.combatant(&self.opponent)?;
        let seed = config.seed_or(self.seed);

        // 0 lets rayon pick one thread per core.
        let threads = self.threads.or(config.threads).unwrap_or(0);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build worker pool")?;

        tracing::info!(
            matches = self.matches,
            seed,
            threads = pool.current_num_threads(),
            "running batch"
        );
        let combat = session.config();
        let stats = pool.install(|| run_batch(&player, &opponent, combat, seed, self.matches));

        match self.format {
            OutputFormat::Summary => print_stats(&player.name, &opponent.name, seed, &stats),
            OutputFormat::Json => render::print_json(&BatchReport {
                player: &player.name,
                opponent: &opponent.name,
                seed,
                win_rate: stats.win_rate(),
                average_rounds: stats.average_rounds(),
                sudden_death_rate: stats.sudden_death_rate(),
                stats,
            })?,
        }
        Ok(())
    }
}

/// Plays `matches` matches on the current rayon pool.
pub fn run_batch(
    player: &Combatant,
    opponent: &Combatant,
    config: &CombatConfig,
    seed: u64,
    matches: u64,
) -> BatchStats {
    (0..matches)
        .into_par_iter()
        .map(|index| {
            let result = simulate_match(
                player.clone(),
                opponent.clone(),
                compute_seed(seed, index, 0),
                config,
            );
            BatchStats::from_result(&result)
        })
        .reduce(BatchStats::default, BatchStats::merge)
}

/// Outcome counts over a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub matches: u64,
    pub player_wins: u64,
    pub opponent_wins: u64,
    pub double_knockouts: u64,
    pub timeouts: u64,
    pub sudden_deaths: u64,
    pub total_rounds: u64,
}

impl BatchStats {
    pub fn from_result(result: &MatchResult) -> Self {
        let mut stats = Self {
            matches: 1,
            total_rounds: u64::from(result.total_rounds),
            sudden_deaths: u64::from(result.was_sudden_death),
            ..Self::default()
        };
        match result.outcome {
            MatchOutcome::PlayerVictory => stats.player_wins = 1,
            MatchOutcome::OpponentVictory => stats.opponent_wins = 1,
            MatchOutcome::DoubleKnockout => stats.double_knockouts = 1,
            MatchOutcome::Timeout => stats.timeouts = 1,
        }
        stats
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            matches: self.matches + other.matches,
            player_wins: self.player_wins + other.player_wins,
            opponent_wins: self.opponent_wins + other.opponent_wins,
            double_knockouts: self.double_knockouts + other.double_knockouts,
            timeouts: self.timeouts + other.timeouts,
            sudden_deaths: self.sudden_deaths + other.sudden_deaths,
            total_rounds: self.total_rounds + other.total_rounds,
        }
    }

    /// Player wins over all matches.
    pub fn win_rate(&self) -> f64 {
        self.rate(self.player_wins)
    }

    pub fn sudden_death_rate(&self) -> f64 {
        self.rate(self.sudden_deaths)
    }

    pub fn average_rounds(&self) -> f64 {
        self.rate(self.total_rounds)
    }

    fn rate(&self, count: u64) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            count as f64 / self.matches as f64
        }
    }
}

#[derive(Serialize)]
struct BatchReport<'a> {
    player: &'a str,
    opponent: &'a str,
    seed: u64,
    win_rate: f64,
    average_rounds: f64,
    sudden_death_rate: f64,
    stats: BatchStats,
}

fn print_stats(player: &str, opponent: &str, seed: u64, stats: &BatchStats) {
    println!(
        "{} {} vs {}",
        style("Batch:").bold().cyan(),
        style(player).bold(),
        style(opponent).bold()
    );
    println!("{} {}", style("Base seed:").bold().cyan(), seed);
    println!("{} {}", style("Matches:").bold().cyan(), stats.matches);
    println!();

    println!("{}", style("=== Outcomes ===").bold().green());
    println!(
        "  {} wins: {} ({:.1}%)",
        player,
        stats.player_wins,
        stats.win_rate() * 100.0
    );
    println!(
        "  {} wins: {} ({:.1}%)",
        opponent,
        stats.opponent_wins,
        stats.rate(stats.opponent_wins) * 100.0
    );
    println!("  Double knockouts: {}", stats.double_knockouts);
    println!("  Timeouts: {}", stats.timeouts);
    println!();

    println!("{}", style("=== Pacing ===").bold().green());
    println!("  Average rounds: {:.2}", stats.average_rounds());
    println!(
        "  Sudden death rate: {:.1}%",
        stats.sudden_death_rate() * 100.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_content::{BuildLoader, ContentRegistry};

    fn combatant(registry: &ContentRegistry, name: &str) -> Combatant {
        let build = BuildLoader::builtin(name).expect("built-in build");
        registry.combatant(&build).expect("compiles").0
    }

    #[test]
    fn empty_batch_has_zero_rates() {
        let stats = BatchStats::default();
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.average_rounds(), 0.0);
    }

    #[test]
    fn stats_merge_by_addition() {
        let a = BatchStats {
            matches: 3,
            player_wins: 2,
            timeouts: 1,
            total_rounds: 40,
            sudden_deaths: 1,
            ..BatchStats::default()
        };
        let b = BatchStats {
            matches: 1,
            opponent_wins: 1,
            total_rounds: 8,
            ..BatchStats::default()
        };
        let merged = a.merge(b);
        assert_eq!(merged.matches, 4);
        assert_eq!(merged.win_rate(), 0.5);
        assert_eq!(merged.average_rounds(), 12.0);
        assert_eq!(merged.sudden_death_rate(), 0.25);
    }

    #[test]
    fn batch_totals_do_not_depend_on_thread_count() {
        let registry = ContentRegistry::builtin().expect("built-in content");
        let player = combatant(&registry, "duelist");
        let opponent = combatant(&registry, "berserker");

        let run = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .expect("pool")
                .install(|| run_batch(&player, &opponent, registry.config(), 11, 24))
        };
        let single = run(1);
        assert_eq!(single.matches, 24);
        assert_eq!(
            single.player_wins + single.opponent_wins + single.double_knockouts + single.timeouts,
            24
        );
        assert_eq!(single, run(4));
    }
}
