//! Racial base table loader.

use std::path::Path;

use arena_core::RaceDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for racial base values from RON files.
pub struct RaceLoader;

impl RaceLoader {
    /// Load race definitions from a RON file.
    ///
    /// RON format: `Vec<RaceDefinition>`
    pub fn load(path: &Path) -> LoadResult<Vec<RaceDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse race definitions from RON source.
    pub fn parse(source: &str) -> LoadResult<Vec<RaceDefinition>> {
        let races: Vec<RaceDefinition> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse race table RON: {}", e))?;

        for (index, race) in races.iter().enumerate() {
            if races[..index].iter().any(|other| other.kind == race.kind) {
                anyhow::bail!("Race {} is defined twice", race.kind);
            }
            if race.base_hp <= 0.0 {
                anyhow::bail!("Race {} has non-positive base HP {}", race.kind, race.base_hp);
            }
            if race.base_mana < 0.0 {
                anyhow::bail!("Race {} has negative base mana {}", race.kind, race.base_mana);
            }
        }

        Ok(races)
    }
}
