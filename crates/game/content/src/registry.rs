//! Assembled content set.
//!
//! [`ContentRegistry`] holds every definition the engine consumes, parsed and
//! validated, together with the [`ContentReport`] produced while loading. It
//! resolves authored [`BuildFile`]s into compiled [`Combatant`]s.

use std::path::Path;

use arena_core::error::{ErrorSeverity, GameError};
use arena_core::stats::{AffixKind, Slot};
use arena_core::{
    BuildRequest, CombatConfig, Combatant, NodeTier, PassiveNodeSpec, RaceDefinition, RaceKind,
    RaceOracle, SkillSpec, StatCompiler, WeaponCategory,
};
use strum::IntoEnumIterator;

use crate::loaders::{
    AffixDefinition, AffixLoader, BuildFile, ConfigLoader, ContentFactory, LoadResult, Loaded,
    PassiveLoader, RaceLoader, SkillLoader,
};
use crate::report::ContentReport;

const BUILTIN_CONFIG: &str = include_str!("../data/combat.toml");
const BUILTIN_RACES: &str = include_str!("../data/races.ron");
const BUILTIN_AFFIXES: &str = include_str!("../data/affixes.ron");
const BUILTIN_SKILLS: &str = include_str!("../data/skills.ron");
const BUILTIN_PASSIVES: &str = include_str!("../data/passives.ron");

/// A problem with a build that does not stop it from being compiled.
///
/// Level and weapon gates on the skill are enforced again during combat,
/// where a locked skill falls back to a basic attack.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BuildIssue {
    #[error("passive {node} requires level {required} (level {level})")]
    PassiveLevelLocked { node: String, required: u32, level: u32 },

    #[error("passive {node} requires {prerequisite}, which is not allocated")]
    MissingPrerequisite { node: String, prerequisite: String },

    #[error("passive {node} is allocated more than once")]
    DuplicatePassive { node: String },

    #[error("only one keystone may be allocated ({first} and {second})")]
    MultipleKeystones { first: String, second: String },

    #[error("{item}: {affix} cannot roll on the {slot} slot")]
    AffixNotAllowed {
        item: String,
        affix: AffixKind,
        slot: Slot,
    },

    #[error("{item}: {affix} value {value} is outside every tier")]
    AffixOutOfRange {
        item: String,
        affix: AffixKind,
        value: f64,
    },

    #[error("{item}: {affix} has no definition")]
    AffixUndefined { item: String, affix: AffixKind },

    #[error("skill {skill} requires level {required} (level {level})")]
    SkillLevelLocked {
        skill: String,
        required: u32,
        level: u32,
    },

    #[error("skill {skill} requires a {required} weapon")]
    SkillWeaponMismatch {
        skill: String,
        required: WeaponCategory,
    },
}

impl GameError for BuildIssue {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PassiveLevelLocked { .. } => "BUILD_PASSIVE_LEVEL_LOCKED",
            Self::MissingPrerequisite { .. } => "BUILD_MISSING_PREREQUISITE",
            Self::DuplicatePassive { .. } => "BUILD_DUPLICATE_PASSIVE",
            Self::MultipleKeystones { .. } => "BUILD_MULTIPLE_KEYSTONES",
            Self::AffixNotAllowed { .. } => "BUILD_AFFIX_NOT_ALLOWED",
            Self::AffixOutOfRange { .. } => "BUILD_AFFIX_OUT_OF_RANGE",
            Self::AffixUndefined { .. } => "BUILD_AFFIX_UNDEFINED",
            Self::SkillLevelLocked { .. } => "BUILD_SKILL_LEVEL_LOCKED",
            Self::SkillWeaponMismatch { .. } => "BUILD_SKILL_WEAPON_MISMATCH",
        }
    }
}

/// A build with every id resolved, ready for compilation.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedBuild {
    pub name: String,
    pub request: BuildRequest,
    pub skill: Option<SkillSpec>,
    pub issues: Vec<BuildIssue>,
}

/// Every definition of one content set.
#[derive(Clone, Debug)]
pub struct ContentRegistry {
    config: CombatConfig,
    races: Vec<RaceDefinition>,
    affixes: Vec<AffixDefinition>,
    skills: Vec<SkillSpec>,
    passives: Vec<PassiveNodeSpec>,
    report: ContentReport,
}

impl ContentRegistry {
    /// The content set embedded in this crate.
    pub fn builtin() -> LoadResult<Self> {
        let config = ConfigLoader::parse(BUILTIN_CONFIG)
            .map_err(|e| anyhow::anyhow!("built-in combat.toml: {}", e))?;
        let races = RaceLoader::parse(BUILTIN_RACES)
            .map_err(|e| anyhow::anyhow!("built-in races.ron: {}", e))?;
        let affixes = AffixLoader::parse(BUILTIN_AFFIXES)
            .map_err(|e| anyhow::anyhow!("built-in affixes.ron: {}", e))?;
        let skills = SkillLoader::parse(BUILTIN_SKILLS)
            .map_err(|e| anyhow::anyhow!("built-in skills.ron: {}", e))?;
        let passives = PassiveLoader::parse(BUILTIN_PASSIVES)
            .map_err(|e| anyhow::anyhow!("built-in passives.ron: {}", e))?;
        Ok(Self::assemble(config, races, affixes, skills, passives))
    }

    /// Loads a content set laid out as described on [`ContentFactory`].
    pub fn from_dir(data_dir: impl AsRef<Path>) -> LoadResult<Self> {
        let factory = ContentFactory::new(data_dir.as_ref());
        Ok(Self::assemble(
            factory.load_config()?,
            factory.load_races()?,
            factory.load_affixes()?,
            factory.load_skills()?,
            factory.load_passives()?,
        ))
    }

    fn assemble(
        config: CombatConfig,
        races: Vec<RaceDefinition>,
        affixes: Vec<AffixDefinition>,
        skills: Loaded<SkillSpec>,
        passives: Loaded<PassiveNodeSpec>,
    ) -> Self {
        let mut report = ContentReport::new();
        report.extend(skills.diagnostics);
        report.extend(passives.diagnostics);

        for kind in RaceKind::iter() {
            if races.race(kind).is_none() {
                tracing::warn!(race = %kind, "race has no definition; builds of it will not compile");
            }
        }

        tracing::info!(
            races = races.len(),
            affixes = affixes.len(),
            skills = skills.items.len(),
            passives = passives.items.len(),
            diagnostics = report.len(),
            "content loaded"
        );

        Self {
            config,
            races,
            affixes,
            skills: skills.items,
            passives: passives.items,
            report,
        }
    }

    /// Replaces the combat configuration, keeping every definition.
    #[must_use]
    pub fn with_config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn races(&self) -> &[RaceDefinition] {
        &self.races
    }

    pub fn affixes(&self) -> &[AffixDefinition] {
        &self.affixes
    }

    pub fn affix(&self, kind: AffixKind) -> Option<&AffixDefinition> {
        self.affixes.iter().find(|affix| affix.kind == kind)
    }

    pub fn skills(&self) -> &[SkillSpec] {
        &self.skills
    }

    pub fn skill(&self, id: &str) -> Option<&SkillSpec> {
        self.skills.iter().find(|skill| skill.id == id)
    }

    pub fn passives(&self) -> &[PassiveNodeSpec] {
        &self.passives
    }

    pub fn passive(&self, id: &str) -> Option<&PassiveNodeSpec> {
        self.passives.iter().find(|node| node.id == id)
    }

    pub fn report(&self) -> &ContentReport {
        &self.report
    }

    /// Stat compiler over this registry's races and configuration.
    pub fn compiler(&self) -> StatCompiler<'_, [RaceDefinition]> {
        StatCompiler::new(&self.config, self.races.as_slice())
    }

    /// Resolves passive and skill ids and checks the build against the tree and affix tables.
    ///
    /// Unknown ids fail; everything else is reported as a [`BuildIssue`].
    pub fn resolve_build(&self, build: &BuildFile) -> LoadResult<ResolvedBuild> {
        let mut issues = Vec::new();

        let mut passives: Vec<PassiveNodeSpec> = Vec::with_capacity(build.passives.len());
        for id in &build.passives {
            let node = self.passive(id).ok_or_else(|| {
                anyhow::anyhow!("Build '{}' allocates unknown passive node '{}'", build.name, id)
            })?;
            if passives.iter().any(|taken| taken.id == node.id) {
                issues.push(BuildIssue::DuplicatePassive {
                    node: node.id.clone(),
                });
                continue;
            }
            passives.push(node.clone());
        }
        issues.extend(passive_issues(&passives, build.level));

        let skill = match &build.skill {
            Some(id) => Some(self.skill(id).cloned().ok_or_else(|| {
                anyhow::anyhow!("Build '{}' equips unknown skill '{}'", build.name, id)
            })?),
            None => None,
        };
        if let Some(skill) = &skill {
            if skill.required_level > build.level {
                issues.push(BuildIssue::SkillLevelLocked {
                    skill: skill.id.clone(),
                    required: skill.required_level,
                    level: build.level,
                });
            }
            let wielded = build
                .equipment
                .weapon
                .as_ref()
                .and_then(|item| item.weapon);
            if let Some(required) = skill.weapon
                && wielded != Some(required)
            {
                issues.push(BuildIssue::SkillWeaponMismatch {
                    skill: skill.id.clone(),
                    required,
                });
            }
        }

        for (slot, item) in build.equipment.items() {
            for rolled in &item.affixes {
                let Some(definition) = self.affix(rolled.kind) else {
                    issues.push(BuildIssue::AffixUndefined {
                        item: item.name.clone(),
                        affix: rolled.kind,
                    });
                    continue;
                };
                if !definition.allows(slot) {
                    issues.push(BuildIssue::AffixNotAllowed {
                        item: item.name.clone(),
                        affix: rolled.kind,
                        slot,
                    });
                }
                if !definition.accepts(rolled.value) {
                    issues.push(BuildIssue::AffixOutOfRange {
                        item: item.name.clone(),
                        affix: rolled.kind,
                        value: rolled.value,
                    });
                }
            }
        }

        for issue in &issues {
            tracing::warn!(build = %build.name, code = issue.error_code(), "{}", issue);
        }

        let request = BuildRequest {
            race: build.race,
            level: build.level,
            attributes: build.attributes,
            equipment: build.equipment.clone(),
            passives,
            wounded: build.wounded,
            last_win_was_pvp: build.last_win_was_pvp,
        };
        Ok(ResolvedBuild {
            name: build.name.clone(),
            request,
            skill,
            issues,
        })
    }

    /// Resolves and compiles a build into a full-HP combatant.
    pub fn combatant(&self, build: &BuildFile) -> LoadResult<(Combatant, Vec<BuildIssue>)> {
        let resolved = self.resolve_build(build)?;
        let snapshot = self
            .compiler()
            .compile(&resolved.request)
            .map_err(|e| anyhow::anyhow!("Build '{}': {}", resolved.name, e))?;
        let mut combatant = Combatant::new(resolved.name, resolved.request.level, snapshot);
        if let Some(skill) = resolved.skill {
            combatant = combatant.with_skill(skill);
        }
        Ok((combatant, resolved.issues))
    }
}

impl RaceOracle for ContentRegistry {
    fn race(&self, kind: RaceKind) -> Option<RaceDefinition> {
        self.races.race(kind)
    }
}

fn passive_issues(passives: &[PassiveNodeSpec], level: u32) -> Vec<BuildIssue> {
    let mut issues = Vec::new();
    let mut keystone: Option<&str> = None;
    for node in passives {
        if node.required_level > level {
            issues.push(BuildIssue::PassiveLevelLocked {
                node: node.id.clone(),
                required: node.required_level,
                level,
            });
        }
        for prerequisite in &node.prerequisites {
            if !passives.iter().any(|taken| &taken.id == prerequisite) {
                issues.push(BuildIssue::MissingPrerequisite {
                    node: node.id.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
        if node.tier == NodeTier::Keystone {
            match keystone {
                Some(first) => issues.push(BuildIssue::MultipleKeystones {
                    first: first.to_owned(),
                    second: node.id.clone(),
                }),
                None => keystone = Some(node.id.as_str()),
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, tier: NodeTier, required_level: u32, prerequisites: &[&str]) -> PassiveNodeSpec {
        PassiveNodeSpec {
            id: id.to_owned(),
            name: id.to_owned(),
            tier,
            required_level,
            prerequisites: prerequisites.iter().map(|p| (*p).to_owned()).collect(),
            modifiers: Vec::new(),
        }
    }

    #[test]
    fn passive_rules() {
        let passives = vec![
            node("N01", NodeTier::Minor, 1, &[]),
            node("N05", NodeTier::Minor, 10, &["N04"]),
            node("N26", NodeTier::Keystone, 1, &["N01"]),
            node("N33", NodeTier::Keystone, 1, &["N01"]),
        ];
        let issues = passive_issues(&passives, 5);

        assert_eq!(
            issues,
            vec![
                BuildIssue::PassiveLevelLocked {
                    node: "N05".to_owned(),
                    required: 10,
                    level: 5
                },
                BuildIssue::MissingPrerequisite {
                    node: "N05".to_owned(),
                    prerequisite: "N04".to_owned()
                },
                BuildIssue::MultipleKeystones {
                    first: "N26".to_owned(),
                    second: "N33".to_owned()
                },
            ]
        );
    }

    #[test]
    fn issue_codes() {
        let issue = BuildIssue::SkillWeaponMismatch {
            skill: "Spark".to_owned(),
            required: WeaponCategory::Wand,
        };
        assert_eq!(issue.to_string(), "skill Spark requires a Wand weapon");
        assert_eq!(issue.error_code(), "BUILD_SKILL_WEAPON_MISMATCH");
        assert_eq!(issue.severity(), ErrorSeverity::Validation);
    }
}
