//! CLI configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Seed used when neither `--seed` nor `ARENA_SEED` is given.
pub const DEFAULT_SEED: u64 = 0;

/// Settings shared by every subcommand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub threads: Option<usize>,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_DATA_DIR` - Content directory (default: built-in content)
    /// - `ARENA_SEED` - Default match seed (default: 0)
    /// - `ARENA_LOG_DIR` - Also write logs to `arena.log` in this directory
    /// - `ARENA_THREADS` - Worker threads for `batch` (default: one per core)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_dir: lookup("ARENA_DATA_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            seed: read_env(&lookup, "ARENA_SEED"),
            log_dir: lookup("ARENA_LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            threads: read_env::<usize>(&lookup, "ARENA_THREADS").map(|threads| threads.max(1)),
        }
    }

    /// An explicit seed wins over `ARENA_SEED`.
    pub fn seed_or(&self, explicit: Option<u64>) -> u64 {
        explicit.or(self.seed).unwrap_or(DEFAULT_SEED)
    }
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
