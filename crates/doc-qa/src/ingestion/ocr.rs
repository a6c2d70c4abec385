//! OCR engines

use once_cell::sync::OnceCell;
use std::io;
use std::process::Command;
use std::time::Duration;

use super::render::RenderedPage;
use super::tools::{has_tool, run_with_timeout};
use crate::error::ExtractionError;

/// Turns a page image into text
pub trait OcrEngine: Send + Sync {
    /// Recognize the text on one page
    ///
    /// Any failure is `OcrUnavailable`; callers do not retry.
    fn recognize(&self, page: &RenderedPage) -> Result<String, ExtractionError>;

    /// Check if the engine can run at all
    fn is_available(&self) -> bool;

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// Tesseract command-line OCR
pub struct TesseractOcr {
    language: String,
    timeout: Duration,
    available: OnceCell<bool>,
}

impl TesseractOcr {
    pub fn new(language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            language: language.into(),
            timeout,
            available: OnceCell::new(),
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, page: &RenderedPage) -> Result<String, ExtractionError> {
        let mut cmd = Command::new("tesseract");
        cmd.arg(page.path())
            .arg("stdout")
            .args(["-l", self.language.as_str()]);

        let output = run_with_timeout(cmd, self.timeout).map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::NotFound => {
                    "tesseract not installed (apt install tesseract-ocr)".to_string()
                }
                _ => e.to_string(),
            };
            ExtractionError::OcrUnavailable(format!("page {}: {}", page.index() + 1, reason))
        })?;

        if !output.status.success() {
            return Err(ExtractionError::OcrUnavailable(format!(
                "tesseract error on page {}: {}",
                page.index() + 1,
                output.stderr_lossy()
            )));
        }

        Ok(output.stdout_lossy())
    }

    fn is_available(&self) -> bool {
        *self
            .available
            .get_or_init(|| has_tool("tesseract", "--version"))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
