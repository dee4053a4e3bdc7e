//! Field rule set: one recognition rule per business field.

pub mod patterns;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::RuleError;
use crate::fields::FieldName;

pub use patterns::FRENCH_RULES;

/// Declarative rule entry: a field and the pattern that recognizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec<'a> {
    pub field: FieldName,
    pub pattern: &'a str,
}

impl<'a> RuleSpec<'a> {
    pub const fn new(field: FieldName, pattern: &'a str) -> Self {
        Self { field, pattern }
    }
}

/// A single match of a rule in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'t> {
    /// Captured value, untrimmed.
    pub value: &'t str,
    /// Byte span of the captured value.
    pub position: (usize, usize),
    /// Full text matched by the rule, including its cue.
    pub source: &'t str,
}

/// Strategy seam between rule tables and the scanning engine.
pub trait RuleMatcher {
    /// Field this matcher recognizes.
    fn field(&self) -> FieldName;

    /// All non-overlapping occurrences, in document order.
    fn occurrences<'t>(&self, text: &'t str) -> Vec<Occurrence<'t>>;

    /// First occurrence in document order.
    fn first_occurrence<'t>(&self, text: &'t str) -> Option<Occurrence<'t>> {
        self.occurrences(text).into_iter().next()
    }
}

/// A compiled rule. Matching is always case-insensitive and multi-line.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    field: FieldName,
    regex: Regex,
}

impl ExtractionRule {
    /// Compile a rule entry.
    pub fn compile(spec: RuleSpec<'_>) -> Result<Self, RuleError> {
        let regex = RegexBuilder::new(spec.pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
            .map_err(|source| RuleError::InvalidPattern {
                field: spec.field,
                source,
            })?;

        Ok(Self {
            field: spec.field,
            regex,
        })
    }

    /// Source pattern of this rule.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn occurrence<'t>(caps: &regex::Captures<'t>) -> Option<Occurrence<'t>> {
        let whole = caps.get(0)?;
        let value = caps.iter().skip(1).flatten().next().unwrap_or(whole);
        Some(Occurrence {
            value: value.as_str(),
            position: (value.start(), value.end()),
            source: whole.as_str(),
        })
    }
}

impl RuleMatcher for ExtractionRule {
    fn field(&self) -> FieldName {
        self.field
    }

    fn occurrences<'t>(&self, text: &'t str) -> Vec<Occurrence<'t>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| Self::occurrence(&caps))
            .collect()
    }

    fn first_occurrence<'t>(&self, text: &'t str) -> Option<Occurrence<'t>> {
        self.regex
            .captures(text)
            .and_then(|caps| Self::occurrence(&caps))
    }
}

lazy_static! {
    static ref DEFAULT_RULES: FieldRuleSet =
        FieldRuleSet::french().expect("built-in rule table must compile");
}

/// Ordered table with exactly one compiled rule per [`FieldName`].
///
/// Construction fails fast on a bad table, so a built rule set can be applied
/// to any text without error.
#[derive(Debug, Clone)]
pub struct FieldRuleSet {
    rules: Vec<ExtractionRule>,
}

impl FieldRuleSet {
    /// Compile and validate a rule table.
    ///
    /// Every field must have exactly one rule and every pattern must compile.
    pub fn new<'a, I>(specs: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = RuleSpec<'a>>,
    {
        let mut slots: [Option<ExtractionRule>; FieldName::COUNT] = Default::default();

        for spec in specs {
            let slot = &mut slots[spec.field.index()];
            if slot.is_some() {
                return Err(RuleError::DuplicateField(spec.field));
            }
            *slot = Some(ExtractionRule::compile(spec)?);
        }

        let mut rules = Vec::with_capacity(FieldName::COUNT);
        for (field, slot) in FieldName::ALL.into_iter().zip(slots) {
            rules.push(slot.ok_or(RuleError::MissingField(field))?);
        }

        debug!("Compiled rule set with {} rules", rules.len());
        Ok(Self { rules })
    }

    /// The built-in French rule table.
    pub fn french() -> Result<Self, RuleError> {
        Self::new(FRENCH_RULES)
    }

    /// Shared, lazily compiled built-in rule set.
    pub fn default_rules() -> &'static FieldRuleSet {
        &DEFAULT_RULES
    }

    /// Rule for `field`.
    pub fn rule(&self, field: FieldName) -> &ExtractionRule {
        &self.rules[field.index()]
    }

    /// Rules in canonical field order.
    pub fn rules(&self) -> impl Iterator<Item = &ExtractionRule> {
        self.rules.iter()
    }

    /// Number of rules (always the number of fields).
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
