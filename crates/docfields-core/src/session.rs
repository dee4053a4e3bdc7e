//! Per-document session holding the in-flight field map.
//!
//! A session walks one document through
//! `Uploaded -> TextExtracted -> FieldsExtracted -> Reviewed -> Exported`.
//! `reset` is the only way back and discards everything derived from the
//! document. Sessions share no state with each other.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SessionError;
use crate::extract::FieldExtractor;
use crate::fields::FieldMap;
use crate::models::record::ExportRecord;
use crate::review::{apply_overrides, Overrides};
use crate::rules::FieldRuleSet;
use crate::score::{score, ConfidenceScore};
use crate::text::TextStats;

/// Lifecycle state of a [`DocumentSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uploaded,
    TextExtracted,
    FieldsExtracted,
    Reviewed,
    Exported,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uploaded => "uploaded",
            Self::TextExtracted => "text extracted",
            Self::FieldsExtracted => "fields extracted",
            Self::Reviewed => "reviewed",
            Self::Exported => "exported",
        };
        f.write_str(name)
    }
}

/// One document's journey from upload to export.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    source_filename: String,
    state: SessionState,
    raw_text: Option<String>,
    extracted: Option<FieldMap>,
    reviewed: Option<FieldMap>,
}

impl DocumentSession {
    /// Start a session for an uploaded document.
    pub fn new(source_filename: impl Into<String>) -> Self {
        Self {
            source_filename: source_filename.into(),
            state: SessionState::Uploaded,
            raw_text: None,
            extracted: None,
            reviewed: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn source_filename(&self) -> &str {
        &self.source_filename
    }

    /// Recognized text, once attached.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn text_stats(&self) -> Option<TextStats> {
        self.raw_text.as_deref().map(TextStats::of)
    }

    /// Field map produced by extraction, before any correction.
    pub fn extracted(&self) -> Option<&FieldMap> {
        self.extracted.as_ref()
    }

    /// Field map after human review.
    pub fn reviewed(&self) -> Option<&FieldMap> {
        self.reviewed.as_ref()
    }

    /// The reviewed map when there is one, else the extracted map.
    pub fn current_fields(&self) -> Option<&FieldMap> {
        self.reviewed.as_ref().or(self.extracted.as_ref())
    }

    /// Completeness score of [`current_fields`](Self::current_fields).
    pub fn confidence(&self) -> Option<ConfidenceScore> {
        self.current_fields().map(score)
    }

    /// Attach the output of the text extractor.
    pub fn attach_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.expect_state(&[SessionState::Uploaded], "attach text")?;

        let text = text.into();
        info!(
            "{}: attached {} chars of recognized text",
            self.source_filename,
            text.len()
        );
        self.raw_text = Some(text);
        self.state = SessionState::TextExtracted;
        Ok(())
    }

    /// Run field extraction over the attached text.
    pub fn extract_fields(&mut self, rules: &FieldRuleSet) -> Result<&FieldMap, SessionError> {
        self.expect_state(&[SessionState::TextExtracted], "extract fields")?;

        let text = self.raw_text.as_deref().unwrap_or_default();
        let fields = FieldExtractor::new(rules).extract(text);
        info!(
            "{}: extracted {}/{} fields",
            self.source_filename,
            fields.populated_count(),
            rules.len()
        );

        self.state = SessionState::FieldsExtracted;
        Ok(self.extracted.insert(fields))
    }

    /// Apply human corrections.
    ///
    /// Corrections always merge over the extracted map, so reviewing again
    /// replaces the previous review instead of stacking on it.
    pub fn review(&mut self, overrides: &Overrides) -> Result<&FieldMap, SessionError> {
        self.expect_state(
            &[SessionState::FieldsExtracted, SessionState::Reviewed],
            "review",
        )?;

        let extracted = self.extracted.as_ref().ok_or(SessionError::InvalidTransition {
            from: self.state,
            action: "review",
        })?;
        let merged = apply_overrides(extracted, overrides);
        info!(
            "{}: reviewed with {} correction(s)",
            self.source_filename,
            overrides.len()
        );

        self.state = SessionState::Reviewed;
        Ok(self.reviewed.insert(merged))
    }

    /// Produce the record for the export sink.
    ///
    /// A reviewed session may be exported more than once (e.g. to several
    /// formats); each export carries its own timestamp.
    pub fn export(&mut self, timestamp: DateTime<FixedOffset>) -> Result<ExportRecord, SessionError> {
        self.expect_state(&[SessionState::Reviewed, SessionState::Exported], "export")?;

        let fields = self.reviewed.clone().ok_or(SessionError::InvalidTransition {
            from: self.state,
            action: "export",
        })?;

        info!("{}: exported", self.source_filename);
        self.state = SessionState::Exported;
        Ok(ExportRecord::new(timestamp, self.source_filename.clone(), fields))
    }

    /// Discard all derived state and start over with the same document.
    pub fn reset(&mut self) {
        info!("{}: reset from {}", self.source_filename, self.state);
        self.state = SessionState::Uploaded;
        self.raw_text = None;
        self.extracted = None;
        self.reviewed = None;
    }

    /// Discard all derived state and start over with a new document.
    pub fn reset_for(&mut self, source_filename: impl Into<String>) {
        self.reset();
        self.source_filename = source_filename.into();
    }

    fn expect_state(
        &self,
        allowed: &[SessionState],
        action: &'static str,
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }
}
