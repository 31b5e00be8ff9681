use crate::definitions::PassiveNodeSpec;
use crate::env::RaceKind;

use super::{Attributes, Equipment};

/// Everything the stat compiler needs to know about a character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildRequest {
    pub race: RaceKind,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Equipment,
    /// Allocated passive nodes, already parsed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<PassiveNodeSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wounded: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_win_was_pvp: bool,
}

impl BuildRequest {
    /// A fresh, unequipped character with starting attributes.
    pub fn new(race: RaceKind, level: u32) -> Self {
        Self {
            race,
            level,
            attributes: Attributes::default(),
            equipment: Equipment::default(),
            passives: Vec::new(),
            wounded: false,
            last_win_was_pvp: false,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }

    #[must_use]
    pub fn with_passives(mut self, passives: Vec<PassiveNodeSpec>) -> Self {
        self.passives = passives;
        self
    }
}
