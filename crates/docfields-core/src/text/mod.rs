//! Text extraction collaborator: turns a document into recognized text.
//!
//! Extraction never fails from the caller's point of view. A document that
//! cannot be read yields an empty string, which field extraction treats as
//! "nothing recognized".

mod pdf;

pub use pdf::PdfTextExtractor;

use serde::{Deserialize, Serialize};

/// File extensions accepted as document input.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["pdf", "png", "jpg", "jpeg", "tiff", "bmp"];

/// Kind of document handed to a [`TextExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// PDF byte stream.
    Pdf,
    /// Raster image (scan or photo).
    RasterImage,
}

impl MediaKind {
    /// Media kind for a file extension, case-insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" | "tiff" | "bmp" => Some(Self::RasterImage),
            _ => None,
        }
    }
}

/// Source of recognized text for a document.
pub trait TextExtractor {
    /// Best-effort text of the document; empty when nothing could be read.
    fn extract_text(&self, data: &[u8], kind: MediaKind) -> String;
}

/// Simple statistics over recognized text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: text.split('\n').count(),
        }
    }
}
