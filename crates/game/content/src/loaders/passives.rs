//! Passive tree loader.

use std::path::Path;

use arena_core::effects::parse_node_effect;
use arena_core::{NodeTier, PassiveNodeSpec, RawEffectMap};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, Loaded, ensure_unique, read_file};
use crate::report::{ContentDiagnostic, DefinitionKind};

/// A passive node as authored in RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveEntry {
    pub id: String,
    pub name: String,
    pub tier: NodeTier,
    pub required_level: u32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub effect: RawEffectMap,
}

impl PassiveEntry {
    pub fn into_spec(self) -> (PassiveNodeSpec, Vec<ContentDiagnostic>) {
        let parsed = parse_node_effect(&self.effect);
        let diagnostics = parsed
            .diagnostics
            .into_iter()
            .map(|diagnostic| ContentDiagnostic::new(DefinitionKind::Passive, &self.id, diagnostic))
            .collect();
        let spec = PassiveNodeSpec {
            id: self.id,
            name: self.name,
            tier: self.tier,
            required_level: self.required_level,
            prerequisites: self.prerequisites,
            modifiers: parsed.value,
        };
        (spec, diagnostics)
    }
}

/// Loader for the passive tree from RON files.
pub struct PassiveLoader;

impl PassiveLoader {
    /// Load passive nodes from a RON file.
    ///
    /// RON format: `Vec<PassiveEntry>`
    pub fn load(path: &Path) -> LoadResult<Loaded<PassiveNodeSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse passive nodes from RON source.
    ///
    /// Every prerequisite must name a node in the same file.
    pub fn parse(source: &str) -> LoadResult<Loaded<PassiveNodeSpec>> {
        let entries: Vec<PassiveEntry> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse passive tree RON: {}", e))?;
        ensure_unique("passive node", entries.iter().map(|entry| entry.id.as_str()))?;

        for entry in &entries {
            for prerequisite in &entry.prerequisites {
                if !entries.iter().any(|other| &other.id == prerequisite) {
                    anyhow::bail!(
                        "Passive node '{}' requires unknown node '{}'",
                        entry.id,
                        prerequisite
                    );
                }
            }
        }

        let mut items = Vec::with_capacity(entries.len());
        let mut diagnostics = Vec::new();
        for entry in entries {
            let (spec, skipped) = entry.into_spec();
            for diagnostic in &skipped {
                diagnostic.emit();
            }
            diagnostics.extend(skipped);
            items.push(spec);
        }

        Ok(Loaded { items, diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::effects::{AdditiveStat, NodeModifier};

    #[test]
    fn empty_effect_gives_no_modifiers() {
        let loaded = PassiveLoader::parse(
            r#"[
                (id: "N01", name: "Core Start", tier: Minor, required_level: 1),
                (
                    id: "N02",
                    name: "Offense Path",
                    tier: Minor,
                    required_level: 1,
                    prerequisites: ["N01"],
                    effect: {"increasedDamage": 0.03},
                ),
            ]"#,
        )
        .expect("valid tree");

        assert!(loaded.diagnostics.is_empty());
        assert!(loaded.items[0].modifiers.is_empty());
        assert_eq!(
            loaded.items[1].modifiers,
            vec![NodeModifier::Add {
                stat: AdditiveStat::IncreasedDamage,
                value: 0.03
            }]
        );
    }

    #[test]
    fn dangling_prerequisite_is_rejected() {
        let err = PassiveLoader::parse(
            r#"[(id: "N02", name: "Offense", tier: Minor, required_level: 1, prerequisites: ["N99"])]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("N99"));
    }
}
