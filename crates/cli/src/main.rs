//! `arena` command-line front end.
//!
//! Plays seeded matches between builds, compiles builds into snapshots and
//! validates content directories. Builds are named by a built-in name, a
//! file under `<data dir>/builds/`, or a path to a RON file.
mod commands;
mod config;
mod logging;
mod render;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Batch, Compile, Pve, Simulate, Validate};
use config::CliConfig;

/// Deterministic arena combat simulator
#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Deterministic arena combat simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory (defaults to ARENA_DATA_DIR, then the built-in content)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter such as `debug` or `arena_core=trace` (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Play one match between two builds
    Simulate(Simulate),

    /// Fight the generated creature of an encounter turn
    Pve(Pve),

    /// Play many seeded matches in parallel and report rates
    Batch(Batch),

    /// Compile a build and print its snapshot
    Compile(Compile),

    /// Load content and report diagnostics and build issues
    Validate(Validate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = CliConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    // Dropping the guard flushes the file writer, so it lives until exit.
    let _guard = logging::setup_logging(cli.log_level.as_deref(), config.log_dir.as_deref())?;

    match cli.command {
        Command::Simulate(cmd) => cmd.execute(&config),
        Command::Pve(cmd) => cmd.execute(&config),
        Command::Batch(cmd) => cmd.execute(&config),
        Command::Compile(cmd) => cmd.execute(&config),
        Command::Validate(cmd) => cmd.execute(&config),
    }
}
