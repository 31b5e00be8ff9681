//! Affix definition loader.

use std::path::Path;

use arena_core::stats::{AffixKind, Slot};
use arena_core::{AffixSpec, TierRange};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// An affix as authored: its tier ranges and the slots it may roll on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixDefinition {
    pub kind: AffixKind,
    pub name: String,
    pub slots: Vec<Slot>,
    pub tiers: Vec<TierRange>,
}

impl AffixDefinition {
    pub fn spec(&self) -> AffixSpec {
        AffixSpec {
            kind: self.kind,
            name: self.name.clone(),
            tiers: self.tiers.clone(),
        }
    }

    pub fn allows(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }

    /// True when `value` could have been rolled at some tier.
    pub fn accepts(&self, value: f64) -> bool {
        self.tiers
            .iter()
            .any(|tier| value >= tier.min && value <= tier.max)
    }
}

/// Loader for affix definitions from RON files.
pub struct AffixLoader;

impl AffixLoader {
    /// Load affix definitions from a RON file.
    ///
    /// RON format: `Vec<AffixDefinition>`
    pub fn load(path: &Path) -> LoadResult<Vec<AffixDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse affix definitions from RON source.
    pub fn parse(source: &str) -> LoadResult<Vec<AffixDefinition>> {
        let affixes: Vec<AffixDefinition> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse affix RON: {}", e))?;

        for (index, affix) in affixes.iter().enumerate() {
            if affixes[..index].iter().any(|other| other.kind == affix.kind) {
                anyhow::bail!("Affix {} is defined twice", affix.kind);
            }
            if affix.tiers.is_empty() {
                anyhow::bail!("Affix {} has no tiers", affix.kind);
            }
            if let Some(tier) = affix.tiers.iter().find(|tier| tier.min > tier.max) {
                anyhow::bail!(
                    "Affix {} has an inverted tier {}..{}",
                    affix.kind,
                    tier.min,
                    tier.max
                );
            }
            if affix.slots.is_empty() {
                anyhow::bail!("Affix {} cannot roll on any slot", affix.kind);
            }
        }

        Ok(affixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "[(
        kind: BlockChanceFlat,
        name: \"% Block Chance\",
        slots: [Offhand],
        tiers: [(min: 0.03, max: 0.05), (min: 0.06, max: 0.08)],
    )]";

    #[test]
    fn parses_slots_and_tiers() {
        let affixes = AffixLoader::parse(BLOCK).expect("valid affix");
        let block = &affixes[0];

        assert!(block.allows(Slot::Offhand));
        assert!(!block.allows(Slot::Weapon));
        assert!(block.accepts(0.07));
        assert!(!block.accepts(0.055));
        assert_eq!(block.spec().tiers.len(), 2);
    }

    #[test]
    fn inverted_tier_is_rejected() {
        let source = BLOCK.replace("(min: 0.06, max: 0.08)", "(min: 0.08, max: 0.06)");
        assert!(AffixLoader::parse(&source).is_err());
    }
}
