//! Field extraction: apply a rule set to recognized text.

use tracing::{debug, trace};

use crate::fields::FieldMap;
use crate::rules::{FieldRuleSet, RuleMatcher};

/// Applies every rule of a [`FieldRuleSet`] to a text.
///
/// Each field is matched independently; the first occurrence in document
/// order wins and is trimmed. A field with no occurrence is absent. No
/// occurrence is rejected on plausibility grounds.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor<'r> {
    rules: &'r FieldRuleSet,
}

impl<'r> FieldExtractor<'r> {
    /// Extractor over a specific rule set.
    pub fn new(rules: &'r FieldRuleSet) -> Self {
        Self { rules }
    }

    /// Rule set this extractor applies.
    pub fn rules(&self) -> &'r FieldRuleSet {
        self.rules
    }

    /// Extract every field from `text`. Never fails; empty or garbled text
    /// yields a map with every field absent.
    pub fn extract(&self, text: &str) -> FieldMap {
        let mut fields = FieldMap::empty();

        for rule in self.rules.rules() {
            match rule.first_occurrence(text) {
                Some(found) => {
                    trace!(
                        "{} matched {:?} at {}..{}",
                        rule.field(),
                        found.source,
                        found.position.0,
                        found.position.1
                    );
                    fields.set(rule.field(), found.value);
                }
                None => trace!("{} not found", rule.field()),
            }
        }

        debug!(
            "Extracted {}/{} fields from {} chars",
            fields.populated_count(),
            self.rules.len(),
            text.len()
        );

        fields
    }
}

impl Default for FieldExtractor<'static> {
    fn default() -> Self {
        Self::new(FieldRuleSet::default_rules())
    }
}

/// Extract every field from `text` with the built-in rule set.
pub fn extract_fields(text: &str) -> FieldMap {
    FieldExtractor::default().extract(text)
}
