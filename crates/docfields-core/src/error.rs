//! Error types for the docfields-core library.

use thiserror::Error;

use crate::fields::FieldName;
use crate::session::SessionState;

/// Main error type for the docfields library.
#[derive(Error, Debug)]
pub enum DocfieldsError {
    /// Field rule set could not be built.
    #[error("rule set error: {0}")]
    Rule(#[from] RuleError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Document session error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Unknown field name in user input.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while validating a field rule set.
///
/// These are configuration defects and surface when the rule set is built,
/// never while a document is being processed.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A rule pattern failed to compile.
    #[error("invalid pattern for {field}: {source}")]
    InvalidPattern {
        field: FieldName,
        #[source]
        source: regex::Error,
    },

    /// No rule was supplied for a field.
    #[error("no rule defined for {0}")]
    MissingField(FieldName),

    /// More than one rule was supplied for a field.
    #[error("duplicate rule for {0}")]
    DuplicateField(FieldName),
}

/// Errors related to field names supplied as text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The name does not match any known field.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// An override was not of the form `field=value`.
    #[error("malformed override (expected field=value): {0}")]
    MalformedOverride(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to the document session lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested step is not reachable from the current state.
    #[error("cannot {action} while session is {from}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },
}

/// Result type for the docfields library.
pub type Result<T> = std::result::Result<T, DocfieldsError>;
