use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::stats::Resistances;

/// Playable races.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RaceKind {
    Human,
    Dwarf,
    Orc,
    Undead,
    Drakoid,
}

/// Base values a race contributes before attributes and gear.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceDefinition {
    pub kind: RaceKind,
    pub base_hp: f64,
    pub base_mana: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Resistances,
}

impl RaceDefinition {
    pub const fn new(kind: RaceKind, base_hp: f64, base_mana: f64, resistances: Resistances) -> Self {
        Self {
            kind,
            base_hp,
            base_mana,
            resistances,
        }
    }
}

/// Oracle providing racial base stat tables.
///
/// A missing definition is the only failure the stat compiler surfaces.
pub trait RaceOracle: Send + Sync {
    fn race(&self, kind: RaceKind) -> Option<RaceDefinition>;
}

impl RaceOracle for [RaceDefinition] {
    fn race(&self, kind: RaceKind) -> Option<RaceDefinition> {
        self.iter().find(|def| def.kind == kind).copied()
    }
}

impl RaceOracle for Vec<RaceDefinition> {
    fn race(&self, kind: RaceKind) -> Option<RaceDefinition> {
        self.as_slice().race(kind)
    }
}
