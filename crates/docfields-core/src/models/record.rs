//! The validated record handed to export sinks.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fields::{FieldMap, FieldName};

/// Review status of an exported record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    #[default]
    Validated,
}

/// A reviewed field set with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// When the record was exported (ISO-8601).
    pub timestamp: DateTime<FixedOffset>,

    /// Name of the uploaded document.
    pub source_filename: String,

    /// Final field values.
    pub fields: FieldMap,

    pub validation_status: ValidationStatus,
}

impl ExportRecord {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        source_filename: impl Into<String>,
        fields: FieldMap,
    ) -> Self {
        Self {
            timestamp,
            source_filename: source_filename.into(),
            fields,
            validation_status: ValidationStatus::Validated,
        }
    }

    /// Serialize as a JSON object.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Column headers of the tabular form: one column per field.
    pub fn csv_headers() -> Vec<&'static str> {
        FieldName::ALL.iter().map(|f| f.as_str()).collect()
    }

    /// The single data row of the tabular form; absent fields are empty cells.
    pub fn csv_row(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|(_, value)| value.unwrap_or(""))
            .collect()
    }
}

/// Export file name of the form `<prefix>_YYYYMMDD_HHMMSS.<extension>`.
pub fn export_file_name(
    prefix: &str,
    timestamp: &DateTime<FixedOffset>,
    extension: &str,
) -> String {
    format!("{}_{}.{}", prefix, timestamp.format("%Y%m%d_%H%M%S"), extension)
}
