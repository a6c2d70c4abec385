//! Page rasterization for OCR
//!
//! Each rendered page is a [`RenderedPage`] that owns its image file. The pipeline renders
//! one page, runs OCR, then releases the page before rendering the next, so at most one
//! page image exists per extraction at any time.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::{TempDir, TempPath};

use super::tools::run_with_timeout;
use crate::error::ExtractionError;

/// A rasterized page image, deleted on release or drop
#[derive(Debug)]
pub struct RenderedPage {
    index: usize,
    image: TempPath,
}

impl RenderedPage {
    /// Take ownership of an image file for the page at `index` (zero-based)
    pub fn new(index: usize, image: TempPath) -> Self {
        Self { index, image }
    }

    /// Zero-based page index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Location of the image on disk
    pub fn path(&self) -> &Path {
        &self.image
    }

    /// Delete the image now
    pub fn release(self) {
        let index = self.index;
        if let Err(e) = self.image.close() {
            tracing::debug!("Failed to remove image for page {}: {}", index + 1, e);
        }
    }
}

/// Opens documents for page-by-page rasterization
pub trait PageRenderer: Send + Sync {
    /// Prepare a document for rendering
    ///
    /// Fails with `CorruptInput` when the document can't be read at all.
    fn open(&self, data: &[u8]) -> Result<Box<dyn PageSource>, ExtractionError>;
}

/// An opened document
pub trait PageSource {
    /// Total pages in the document
    fn page_count(&self) -> usize;

    /// Rasterize one page (zero-based index)
    fn render(&self, index: usize) -> Result<RenderedPage, ExtractionError>;
}

/// Renderer using poppler's `pdftoppm`, one page per invocation
pub struct PdftoppmRenderer {
    dpi: u32,
    timeout: Duration,
}

impl PdftoppmRenderer {
    pub fn new(dpi: u32, timeout: Duration) -> Self {
        Self { dpi, timeout }
    }

    /// Check if pdftoppm is available
    pub fn is_available() -> bool {
        // pdftoppm -v writes to stderr and exits non-zero on some versions
        super::tools::has_tool("pdftoppm", "-v")
    }
}

impl PageRenderer for PdftoppmRenderer {
    fn open(&self, data: &[u8]) -> Result<Box<dyn PageSource>, ExtractionError> {
        let page_count = lopdf::Document::load_mem(data)
            .map_err(|e| ExtractionError::CorruptInput(format!("Failed to load PDF: {}", e)))?
            .get_pages()
            .len();

        let dir = tempfile::Builder::new()
            .prefix("doc-qa-render-")
            .tempdir()
            .map_err(|e| ExtractionError::OcrUnavailable(format!("Failed to create temp dir: {}", e)))?;

        let pdf_path = dir.path().join("input.pdf");
        std::fs::write(&pdf_path, data)
            .map_err(|e| ExtractionError::OcrUnavailable(format!("Failed to write temp PDF: {}", e)))?;

        Ok(Box::new(PdftoppmSource {
            dir,
            pdf_path,
            page_count,
            dpi: self.dpi,
            timeout: self.timeout,
        }))
    }
}

/// A PDF staged in a temp directory; the directory goes away with the source
struct PdftoppmSource {
    dir: TempDir,
    pdf_path: PathBuf,
    page_count: usize,
    dpi: u32,
    timeout: Duration,
}

impl PageSource for PdftoppmSource {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render(&self, index: usize) -> Result<RenderedPage, ExtractionError> {
        let page_number = (index + 1).to_string();
        let dpi = self.dpi.to_string();
        let prefix = self.dir.path().join(format!("page-{}", page_number));

        let mut cmd = Command::new("pdftoppm");
        cmd.arg("-png")
            .args(["-r", dpi.as_str()])
            .args(["-f", page_number.as_str(), "-l", page_number.as_str()])
            .arg("-singlefile")
            .arg(&self.pdf_path)
            .arg(&prefix);

        let output = run_with_timeout(cmd, self.timeout).map_err(|e| {
            ExtractionError::OcrUnavailable(format!("pdftoppm failed on page {}: {}", page_number, e))
        })?;

        if !output.status.success() {
            return Err(ExtractionError::CorruptInput(format!(
                "pdftoppm error on page {}: {}",
                page_number,
                output.stderr_lossy()
            )));
        }

        let image_path = prefix.with_extension("png");
        if !image_path.exists() {
            return Err(ExtractionError::OcrUnavailable(format!(
                "pdftoppm produced no image for page {}",
                page_number
            )));
        }

        Ok(RenderedPage::new(index, TempPath::from_path(image_path)))
    }
}
