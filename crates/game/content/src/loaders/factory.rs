//! Content factory for loading a content set from a data directory.

use std::path::{Path, PathBuf};

use arena_core::{CombatConfig, PassiveNodeSpec, RaceDefinition, SkillSpec};

use crate::loaders::{
    AffixDefinition, AffixLoader, BuildFile, BuildLoader, ConfigLoader, LoadResult, Loaded,
    PassiveLoader, RaceLoader, SkillLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── races.ron
/// ├── affixes.ron
/// ├── skills.ron
/// ├── passives.ron
/// └── builds/
///     ├── duelist.ron
///     └── berserker.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `combat.toml`.
    ///
    /// A missing file means the default configuration.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no combat.toml, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load racial base values from `races.ron`.
    pub fn load_races(&self) -> LoadResult<Vec<RaceDefinition>> {
        RaceLoader::load(&self.data_dir.join("races.ron"))
    }

    /// Load affix definitions from `affixes.ron`.
    pub fn load_affixes(&self) -> LoadResult<Vec<AffixDefinition>> {
        AffixLoader::load(&self.data_dir.join("affixes.ron"))
    }

    /// Load skills from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Loaded<SkillSpec>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load the passive tree from `passives.ron`.
    pub fn load_passives(&self) -> LoadResult<Loaded<PassiveNodeSpec>> {
        PassiveLoader::load(&self.data_dir.join("passives.ron"))
    }

    /// Load a build from `builds/{name}.ron`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the build file (without `.ron` extension)
    pub fn load_build(&self, name: &str) -> LoadResult<BuildFile> {
        let path = self.data_dir.join("builds").join(format!("{}.ron", name));
        BuildLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
