//! Document kinds and extraction results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declared kind of an uploaded document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// PDF document (text layer first, OCR fallback)
    Pdf,
    /// Raster image (OCR only)
    Image,
}

impl DocumentKind {
    /// Detect document kind from extension
    ///
    /// Returns `None` for extensions the upload endpoint does not accept.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "tif" => Some(Self::Image),
            _ => None,
        }
    }

    /// Detect document kind from a filename
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Check if this kind goes straight to OCR
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image)
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Image => "Image",
        }
    }
}

/// Strategy that produced a document's text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Native text layer
    Direct,
    /// Rasterized pages run through OCR
    Ocr,
}

/// Text extracted from one document
///
/// Immutable once produced. The session record that binds it owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    /// Extracted plain text
    pub text: String,
    /// Strategy that produced the text
    pub method: ExtractionMethod,
    /// Pages read by the winning strategy
    pub pages_processed: u32,
    /// When extraction finished
    pub created_at: DateTime<Utc>,
}

impl ExtractedDocument {
    /// Create a new extraction result stamped with the current time
    pub fn new(text: String, method: ExtractionMethod, pages_processed: u32) -> Self {
        Self {
            text,
            method,
            pages_processed,
            created_at: Utc::now(),
        }
    }

    /// Character count of the text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
