//! Core library for structured field extraction from recognized document text.
//!
//! This crate provides:
//! - A declarative field rule set (reference, names, date, amount, SIRET/SIREN,
//!   address, phone, email)
//! - A field extractor applying the rules to raw text (first match wins)
//! - A heuristic completeness score
//! - A human review layer merging corrections over extracted fields
//! - A per-document session state machine and the exported record model
//! - A PDF text-layer extractor for the text extraction step

pub mod error;
pub mod extract;
pub mod fields;
pub mod models;
pub mod review;
pub mod rules;
pub mod score;
pub mod session;
pub mod text;

pub use error::{DocfieldsError, Result};
pub use extract::{extract_fields, FieldExtractor};
pub use fields::{FieldMap, FieldName};
pub use models::{DocfieldsConfig, ExportRecord};
pub use review::{apply_overrides, Overrides};
pub use rules::{FieldRuleSet, RuleMatcher, RuleSpec};
pub use score::{score, Completeness, ConfidenceScore};
pub use session::{DocumentSession, SessionState};
pub use text::{MediaKind, PdfTextExtractor, TextExtractor};
