//! Combat configuration loader.

use std::path::Path;

use arena_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing CombatConfig
    ///
    /// Keys missing from the file keep their default values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a CombatConfig from TOML source and check it is playable.
    pub fn parse(source: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &CombatConfig) -> LoadResult<()> {
        let rounds = &config.rounds;
        if rounds.normal_limit == 0 || rounds.absolute_cap <= rounds.normal_limit {
            anyhow::bail!(
                "Round limits must satisfy 0 < normal_limit < absolute_cap (got {} and {})",
                rounds.normal_limit,
                rounds.absolute_cap
            );
        }
        if rounds.sudden_death_ratio <= 0.0 {
            anyhow::bail!("sudden_death_ratio must be positive");
        }

        let hit = &config.hit;
        if !(0.0..=1.0).contains(&hit.min_chance) || !(hit.min_chance..=1.0).contains(&hit.max_chance) {
            anyhow::bail!(
                "Hit chance band {}..{} must lie within 0..1",
                hit.min_chance,
                hit.max_chance
            );
        }

        let caps = &config.caps;
        if caps.resistance_min > caps.resistance_max {
            anyhow::bail!(
                "Resistance range {}..{} is inverted",
                caps.resistance_min,
                caps.resistance_max
            );
        }
        if config.damage.armor_constant <= 0.0 {
            anyhow::bail!("armor_constant must be positive");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("[rounds]\nnormal_limit = 10\n").expect("valid config");
        assert_eq!(config.rounds.normal_limit, 10);
        assert_eq!(config.rounds.absolute_cap, 50);
        assert_eq!(config.caps, CombatConfig::default().caps);
    }

    #[test]
    fn inverted_round_limits_are_rejected() {
        let err = ConfigLoader::parse("[rounds]\nnormal_limit = 60\n").unwrap_err();
        assert!(err.to_string().contains("normal_limit"));
    }

    #[test]
    fn empty_file_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").expect("empty is valid"), CombatConfig::default());
    }
}
