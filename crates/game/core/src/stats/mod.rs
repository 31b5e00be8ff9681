//! Stat compilation.
//!
//! A [`BuildRequest`] (race, attributes, gear, allocated passives) is compiled
//! by [`StatCompiler`] into a flat, combat-ready [`CharacterSnapshot`].
//!
//! ```text
//! [ Attributes + Race ]
//!      ↓
//! [ Gear affixes ]
//!      ↓
//! [ Passive BonusBundle ]   (BonusAggregator)
//!      ↓
//! [ Racial traits ]
//!      ↓
//! [ CharacterSnapshot ]
//! ```
//!
//! Every step reads only the output of earlier steps, so the snapshot is a
//! pure function of its inputs.

mod aggregate;
mod attributes;
mod bonus;
mod build;
mod compile;
mod gear;
mod racial;
mod snapshot;

pub use aggregate::BonusAggregator;
pub use attributes::Attributes;
pub use bonus::BonusBundle;
pub use build::BuildRequest;
pub use compile::{CompileError, StatCompiler};
pub use gear::{AffixKind, EquippedItem, Equipment, ItemBase, RolledAffix, Slot, WeaponCategory};
pub use racial::{RacialFlags, RacialTraits};
pub use snapshot::{
    CharacterSnapshot, DamageFigures, FlatElemental, IncreasedMultipliers, Resistances,
};
