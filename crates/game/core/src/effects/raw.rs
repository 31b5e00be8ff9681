//! Authored effect documents before parsing.
//!
//! Content files describe effects as loose key/value maps. They are parsed
//! once into the closed enums of [`super::spec`]; nothing in combat reads a
//! [`RawEffectMap`].

use std::collections::BTreeMap;

/// Effect document as authored: field name to value.
pub type RawEffectMap = BTreeMap<String, RawValue>;

/// A single authored value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Map(RawEffectMap),
}

impl RawValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    /// Non-negative whole number.
    pub fn as_u32(&self) -> Option<u32> {
        let value = self.as_f64()?;
        (value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX)).then_some(value as u32)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&RawEffectMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Map(_) => "map",
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<RawEffectMap> for RawValue {
    fn from(value: RawEffectMap) -> Self {
        Self::Map(value)
    }
}

/// Builds a [`RawEffectMap`] from `(key, value)` pairs.
pub fn raw_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> RawEffectMap
where
    K: Into<String>,
    V: Into<RawValue>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
