//! Content loaders for reading game data from files.
//!
//! Each loader reads one RON or TOML file and returns engine types from
//! `arena-core`. Loaders that parse effect documents also return the
//! diagnostics produced while parsing.

pub mod affixes;
pub mod builds;
pub mod config;
pub mod factory;
pub mod passives;
pub mod races;
pub mod skills;

pub use affixes::{AffixDefinition, AffixLoader};
pub use builds::{BUILTIN_BUILDS, BuildFile, BuildLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use passives::{PassiveEntry, PassiveLoader};
pub use races::RaceLoader;
pub use skills::{SkillEntry, SkillLoader};

use std::path::Path;

use crate::report::ContentDiagnostic;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Definitions parsed from one file plus the effect fields that were skipped.
#[derive(Clone, Debug)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub diagnostics: Vec<ContentDiagnostic>,
}

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Fails on the first id that appears twice.
pub(crate) fn ensure_unique<'a>(
    what: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> LoadResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id '{}'", what, id);
        }
    }
    Ok(())
}
