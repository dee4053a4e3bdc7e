//! Data models: configuration and the exported record.

pub mod config;
pub mod record;

pub use config::{DocfieldsConfig, ExportConfig, ExportFormat, PdfConfig};
pub use record::{export_file_name, ExportRecord, ValidationStatus};
