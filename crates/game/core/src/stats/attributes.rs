//! Primary attributes.

/// The seven allocatable attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub agility: i32,
    pub intelligence: i32,
    pub vitality: i32,
    pub wisdom: i32,
    pub luck: i32,
}

impl Attributes {
    /// Starting value of every attribute on a fresh character.
    pub const STARTING_VALUE: i32 = 5;

    pub const fn uniform(value: i32) -> Self {
        Self {
            strength: value,
            dexterity: value,
            agility: value,
            intelligence: value,
            vitality: value,
            wisdom: value,
            luck: value,
        }
    }

    /// Scales every attribute by `multiplier`, truncating toward zero.
    pub fn scaled(&self, multiplier: f64) -> Self {
        let scale = |value: i32| (f64::from(value) * multiplier) as i32;
        Self {
            strength: scale(self.strength),
            dexterity: scale(self.dexterity),
            agility: scale(self.agility),
            intelligence: scale(self.intelligence),
            vitality: scale(self.vitality),
            wisdom: scale(self.wisdom),
            luck: scale(self.luck),
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(Self::STARTING_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wound_scaling_truncates() {
        let attributes = Attributes {
            strength: 20,
            dexterity: 33,
            ..Attributes::default()
        };
        let wounded = attributes.scaled(0.97);
        assert_eq!(wounded.strength, 19);
        assert_eq!(wounded.dexterity, 32);
        assert_eq!(wounded.luck, 4);
    }
}
