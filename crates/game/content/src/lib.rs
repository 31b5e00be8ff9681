//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML data files:
//! - Racial base tables
//! - Affix definitions with tiered roll ranges and allowed slots
//! - Active skills, with effect documents parsed at load time
//! - The passive tree, with effect documents parsed at load time
//! - Combat configuration (TOML)
//! - Character builds that reference skills and passives by id
//!
//! A copy of every data file is embedded, so [`ContentRegistry::builtin`]
//! needs no filesystem. Effect fields that cannot be parsed are skipped,
//! logged, and collected into a [`ContentReport`].

pub mod report;

#[cfg(feature = "loaders")]
pub mod loaders;
#[cfg(feature = "loaders")]
pub mod registry;

pub use report::{ContentDiagnostic, ContentReport, DefinitionKind};

#[cfg(feature = "loaders")]
pub use loaders::{
    AffixDefinition, AffixLoader, BUILTIN_BUILDS, BuildFile, BuildLoader, ConfigLoader,
    ContentFactory, LoadResult, Loaded, PassiveLoader, RaceLoader, SkillLoader,
};
#[cfg(feature = "loaders")]
pub use registry::{BuildIssue, ContentRegistry, ResolvedBuild};
