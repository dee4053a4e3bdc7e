//! Completeness scoring for an extracted field map.
//!
//! The score is a heuristic completeness proxy: each populated field adds
//! [`POINTS_PER_FIELD`] points, capped at [`MAX_SCORE`]. It is not a
//! probability and says nothing about whether the values are correct.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fields::{FieldMap, FieldName};

/// Points contributed by each populated field.
pub const POINTS_PER_FIELD: u32 = 12;

/// Upper bound of the score.
pub const MAX_SCORE: u8 = 100;

/// Heuristic completeness score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScore(u8);

impl ConfidenceScore {
    /// Score for a number of populated fields.
    pub fn from_populated(populated: usize) -> Self {
        let points = (populated as u64).saturating_mul(POINTS_PER_FIELD as u64);
        Self(points.min(MAX_SCORE as u64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Score a field map. Always recomputed from the map, never cached.
pub fn score(fields: &FieldMap) -> ConfidenceScore {
    ConfidenceScore::from_populated(fields.populated_count())
}

/// Populated-over-total field count, e.g. "5/9 champs".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub populated: usize,
    pub total: usize,
}

impl Completeness {
    pub fn of(fields: &FieldMap) -> Self {
        Self {
            populated: fields.populated_count(),
            total: FieldName::COUNT,
        }
    }
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} champs", self.populated, self.total)
    }
}
