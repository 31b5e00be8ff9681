//! Content loaded for one command invocation.

use anyhow::{Context, Result};
use arena_content::{BuildFile, BuildIssue, BuildLoader, ContentFactory, ContentRegistry};
use arena_core::{CombatConfig, Combatant};

use crate::config::CliConfig;

/// The registry a command works against, plus the directory it came from.
pub struct Session {
    registry: ContentRegistry,
    factory: Option<ContentFactory>,
}

impl Session {
    /// Loads the configured data directory, or the built-in content.
    pub fn open(config: &CliConfig) -> Result<Self> {
        match &config.data_dir {
            Some(dir) => {
                let registry = ContentRegistry::from_dir(dir)
                    .with_context(|| format!("Failed to load content from {}", dir.display()))?;
                Ok(Self {
                    registry,
                    factory: Some(ContentFactory::new(dir)),
                })
            }
            None => Ok(Self {
                registry: ContentRegistry::builtin()?,
                factory: None,
            }),
        }
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CombatConfig {
        self.registry.config()
    }

    /// Looks `spec` up in `<data dir>/builds/` first, then as a path or built-in name.
    pub fn build(&self, spec: &str) -> Result<BuildFile> {
        if let Some(factory) = &self.factory {
            let path = factory.data_dir().join("builds").join(format!("{}.ron", spec));
            if path.is_file() {
                return factory.load_build(spec);
            }
        }
        BuildLoader::resolve(spec)
    }

    /// Compiles `spec` into a combatant. Rule issues were already logged.
    pub fn combatant(&self, spec: &str) -> Result<(Combatant, Vec<BuildIssue>)> {
        let build = self.build(spec)?;
        self.registry.combatant(&build)
    }

    /// Names of the builds this session can check without arguments.
    ///
    /// With a data directory these are the stems under `builds/`; otherwise
    /// the built-in builds.
    pub fn build_names(&self) -> Result<Vec<String>> {
        let Some(factory) = &self.factory else {
            return Ok(arena_content::BUILTIN_BUILDS
                .iter()
                .map(|(name, _)| name.to_string())
                .collect());
        };

        let dir = factory.data_dir().join("builds");
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
            .filter_map(|path| Some(path.file_stem()?.to_str()?.to_string()))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_session_lists_builtin_builds() {
        let session = Session::open(&CliConfig::default()).expect("built-in content");
        let names = session.build_names().expect("names");
        assert_eq!(names.len(), arena_content::BUILTIN_BUILDS.len());
        assert!(session.build("Duelist").is_ok());
    }

    #[test]
    fn data_dir_builds_shadow_builtins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let builds = dir.path().join("builds");
        std::fs::create_dir(&builds).expect("builds dir");
        std::fs::write(
            builds.join("duelist.ron"),
            "(name: \"Local Duelist\", race: Orc, level: 2)",
        )
        .expect("write build");
        std::fs::write(builds.join("notes.txt"), "not a build").expect("write notes");

        let session = Session {
            registry: ContentRegistry::builtin().expect("built-in content"),
            factory: Some(ContentFactory::new(dir.path())),
        };
        assert_eq!(session.build("duelist").expect("local build").name, "Local Duelist");
        // Names not found locally fall back to the built-ins.
        assert_eq!(session.build("ranger").expect("built-in").level, 10);
        assert_eq!(session.build_names().expect("names"), vec!["duelist".to_string()]);
    }
}
