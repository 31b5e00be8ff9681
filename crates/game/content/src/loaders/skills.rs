//! Active skill loader.
//!
//! Skill effects are authored as loose effect documents and parsed here, once.
//! A skill whose document has problems still loads with the parts that parsed.

use std::path::Path;

use arena_core::effects::parse_skill_effect;
use arena_core::{DamageType, RawEffectMap, SkillSpec, WeaponCategory};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, Loaded, ensure_unique, read_file};
use crate::report::{ContentDiagnostic, DefinitionKind};

/// A skill as authored in RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub weapon: Option<WeaponCategory>,
    pub multiplier: f64,
    #[serde(default)]
    pub mana_cost: f64,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default = "default_required_level")]
    pub required_level: u32,
    pub damage_type: DamageType,
    #[serde(default)]
    pub effect: RawEffectMap,
}

fn default_required_level() -> u32 {
    1
}

impl SkillEntry {
    /// Parses the effect document and returns the skill with its diagnostics.
    pub fn into_spec(self) -> (SkillSpec, Vec<ContentDiagnostic>) {
        let parsed = parse_skill_effect(&self.effect);
        let diagnostics = parsed
            .diagnostics
            .into_iter()
            .map(|diagnostic| ContentDiagnostic::new(DefinitionKind::Skill, &self.id, diagnostic))
            .collect();
        let spec = SkillSpec {
            id: self.id,
            name: self.name,
            weapon: self.weapon,
            multiplier: self.multiplier,
            mana_cost: self.mana_cost,
            cooldown: self.cooldown,
            required_level: self.required_level,
            damage_type: self.damage_type,
            effect: parsed.value,
        };
        (spec, diagnostics)
    }
}

/// Loader for skill definitions from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load skills from a RON file.
    ///
    /// RON format: `Vec<SkillEntry>`
    pub fn load(path: &Path) -> LoadResult<Loaded<SkillSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse skills from RON source.
    pub fn parse(source: &str) -> LoadResult<Loaded<SkillSpec>> {
        let entries: Vec<SkillEntry> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill RON: {}", e))?;
        ensure_unique("skill", entries.iter().map(|entry| entry.id.as_str()))?;

        let mut items = Vec::with_capacity(entries.len());
        let mut diagnostics = Vec::new();
        for entry in entries {
            if entry.multiplier < 0.0 || entry.mana_cost < 0.0 {
                anyhow::bail!("Skill '{}' has a negative multiplier or mana cost", entry.id);
            }
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
