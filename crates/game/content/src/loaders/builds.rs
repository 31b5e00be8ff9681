//! Character build loader.
//!
//! A build file names its passives and skill by id. Ids are resolved against
//! a [`ContentRegistry`](crate::registry::ContentRegistry).

use std::path::Path;

use arena_core::stats::Attributes;
use arena_core::{Equipment, RaceKind};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Sample builds shipped with the crate, by name.
pub const BUILTIN_BUILDS: [(&str, &str); 5] = [
    ("duelist", include_str!("../../data/builds/duelist.ron")),
    ("berserker", include_str!("../../data/builds/berserker.ron")),
    ("ranger", include_str!("../../data/builds/ranger.ron")),
    ("pyromancer", include_str!("../../data/builds/pyromancer.ron")),
    ("stormcaller", include_str!("../../data/builds/stormcaller.ron")),
];

/// A character build as authored in RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildFile {
    pub name: String,
    pub race: RaceKind,
    pub level: u32,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub equipment: Equipment,
    /// Allocated passive node ids.
    #[serde(default)]
    pub passives: Vec<String>,
    /// Equipped skill id.
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub wounded: bool,
    #[serde(default)]
    pub last_win_was_pvp: bool,
}

/// Loader for build files.
pub struct BuildLoader;

impl BuildLoader {
    /// Load a build from a RON file.
    pub fn load(path: &Path) -> LoadResult<BuildFile> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse a build from RON source.
    pub fn parse(source: &str) -> LoadResult<BuildFile> {
        let build: BuildFile = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse build RON: {}", e))?;
        if build.level == 0 {
            anyhow::bail!("Build '{}' has level 0", build.name);
        }
        Ok(build)
    }

    /// One of the [`BUILTIN_BUILDS`], by name.
    pub fn builtin(name: &str) -> LoadResult<BuildFile> {
        let (_, source) = BUILTIN_BUILDS
            .iter()
            .find(|(builtin, _)| builtin.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let known: Vec<&str> = BUILTIN_BUILDS.iter().map(|(name, _)| *name).collect();
                anyhow::anyhow!("Unknown built-in build '{}' (known: {})", name, known.join(", "))
            })?;
        Self::parse(source)
    }

    /// Resolves `spec` as a file path when it exists, otherwise as a built-in name.
    pub fn resolve(spec: &str) -> LoadResult<BuildFile> {
        let path = Path::new(spec);
        if path.is_file() {
            Self::load(path)
        } else {
            Self::builtin(spec)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::WeaponCategory;

    #[test]
    fn every_builtin_build_parses() {
        for (name, _) in BUILTIN_BUILDS {
            let build = BuildLoader::builtin(name).expect("built-in build parses");
            assert_eq!(build.level, 10, "{name}");
            assert!(build.skill.is_some(), "{name}");
        }
    }

    #[test]
    fn minimal_build_uses_defaults() {
        let build = BuildLoader::parse("(name: \"Bare\", race: Orc, level: 1)").expect("valid build");
        assert_eq!(build.attributes, Attributes::default());
        assert!(build.equipment.weapon.is_none());
        assert!(build.passives.is_empty());
        assert!(!build.wounded);
    }

    #[test]
    fn builtin_lookup_ignores_case() {
        let build = BuildLoader::builtin("Ranger").expect("known build");
        let weapon = build.equipment.weapon.expect("ranger has a bow");
        assert_eq!(weapon.weapon, Some(WeaponCategory::Bow));
        assert!(BuildLoader::builtin("paladin").is_err());
    }
}
