//! Embedded-text extraction from PDF documents using lopdf and pdf-extract.

use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, warn};

use super::{MediaKind, TextExtractor};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Reads the text layer of PDF documents.
///
/// Raster images carry no text layer; they need an external OCR step and
/// yield an empty string here.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    config: PdfConfig,
}

impl PdfTextExtractor {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    /// Extract the text of a PDF, reporting why it failed.
    ///
    /// The PDF parsers panic on some malformed content (for instance a font
    /// missing from the page resources); such a panic is reported as
    /// [`PdfError::TextExtraction`].
    pub fn try_extract(&self, data: &[u8]) -> Result<String, PdfError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.read_text_layer(data))).unwrap_or_else(
            |payload| {
                let reason = panic_message(payload.as_ref());
                warn!("PDF text extractor panicked: {}", reason);
                Err(PdfError::TextExtraction(format!("extractor panicked: {}", reason)))
            },
        )
    }

    fn read_text_layer(&self, data: &[u8]) -> Result<String, PdfError> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw: Cow<'_, [u8]> = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            Cow::Owned(decrypted)
        } else {
            Cow::Borrowed(data)
        };

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        let limit = self.config.max_pages;
        let text = if limit == 0 || pages.len() <= limit {
            debug!("Extracting text from all {} pages", pages.len());
            pdf_extract::extract_text_from_mem(&raw)
                .map_err(|e| PdfError::TextExtraction(e.to_string()))?
        } else {
            debug!("Extracting text from {} of {} pages", limit, pages.len());
            doc.extract_text(&pages[..limit])
                .map_err(|e| PdfError::TextExtraction(e.to_string()))?
        };

        Ok(text)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, data: &[u8], kind: MediaKind) -> String {
        match kind {
            MediaKind::Pdf => match self.try_extract(data) {
                Ok(text) if text.trim().chars().count() < self.config.min_text_length => {
                    warn!(
                        "PDF text layer shorter than {} characters, treating as empty",
                        self.config.min_text_length
                    );
                    String::new()
                }
                Ok(text) => text,
                Err(e) => {
                    warn!("PDF text extraction failed: {}", e);
                    String::new()
                }
            },
            MediaKind::RasterImage => {
                warn!("Raster images have no text layer; OCR must run upstream");
                String::new()
            }
        }
    }
}
