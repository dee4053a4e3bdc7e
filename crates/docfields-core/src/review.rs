//! Human review: merge corrections over an extracted field map.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::fields::{normalize_value, FieldMap, FieldName};

/// Human-supplied replacements keyed by field.
///
/// A blank replacement clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides {
    values: BTreeMap<FieldName, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the correction for `field`.
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) -> &mut Self {
        self.values.insert(field, value.into());
        self
    }

    /// Builder form of [`Overrides::set`].
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Parse a list of `field=value` assignments.
    pub fn parse_assignments<I, S>(assignments: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::new();
        for assignment in assignments {
            let Assignment(field, value) = assignment.as_ref().parse()?;
            overrides.set(field, value);
        }
        Ok(overrides)
    }
}

impl FromIterator<(FieldName, String)> for Overrides {
    fn from_iter<T: IntoIterator<Item = (FieldName, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A single `field=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(pub FieldName, pub String);

impl FromStr for Assignment {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| FieldError::MalformedOverride(s.to_string()))?;
        Ok(Self(key.parse()?, value.to_string()))
    }
}

/// Merge `overrides` over `fields` into a new map.
///
/// A replacement always wins over the extracted value; a blank replacement
/// leaves the field absent. Fields without a replacement keep their
/// extracted value. The input map is not modified.
pub fn apply_overrides(fields: &FieldMap, overrides: &Overrides) -> FieldMap {
    let mut merged = fields.clone();
    for (field, value) in overrides.iter() {
        match normalize_value(value) {
            Some(value) => merged.set(field, &value),
            None => merged.clear(field),
        }
    }
    merged
}
