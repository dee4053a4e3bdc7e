//! Complete mapping from every field to an optional value.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::FieldName;

/// Trim a candidate value and fold CRLF line ends to `\n`; blank input means
/// "not found".
pub fn normalize_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.replace("\r\n", "\n"))
    }
}

/// Values for every [`FieldName`] of one document.
///
/// There is exactly one slot per field, so a map can never be missing a key.
/// Present values are always trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    values: [Option<String>; FieldName::COUNT],
}

impl FieldMap {
    /// Map with every field absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a map from `(field, value)` pairs. Later pairs win; blank values are absent.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (FieldName, &'a str)>,
    {
        let mut map = Self::empty();
        for (field, value) in pairs {
            map.set(field, value);
        }
        map
    }

    /// Value of `field`, if present.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Whether `field` holds a value.
    pub fn is_present(&self, field: FieldName) -> bool {
        self.values[field.index()].is_some()
    }

    /// All fields with their optional values, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, Option<&str>)> + '_ {
        FieldName::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }

    /// Present fields only.
    pub fn populated(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        self.iter()
            .filter_map(|(field, value)| value.map(|v| (field, v)))
    }

    /// Fields without a value.
    pub fn missing(&self) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|field| !self.is_present(*field))
            .collect()
    }

    /// Number of present fields.
    pub fn populated_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub(crate) fn set(&mut self, field: FieldName, raw: &str) {
        self.values[field.index()] = normalize_value(raw);
    }

    pub(crate) fn clear(&mut self, field: FieldName) {
        self.values[field.index()] = None;
    }
}

impl fmt::Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, value) in self.iter() {
            writeln!(f, "{}: {}", field.label(), value.unwrap_or("Non trouvé"))?;
        }
        Ok(())
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FieldName::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_str(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<FieldName, Option<String>>::deserialize(deserializer)?;

        let mut map = FieldMap::empty();
        for field in FieldName::ALL {
            match raw.get(&field) {
                Some(Some(value)) => map.set(field, value),
                Some(None) => {}
                None => return Err(de::Error::missing_field(field.as_str())),
            }
        }
        Ok(map)
    }
}
