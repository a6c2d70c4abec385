//! Dual-strategy extraction: native text layer first, page-capped OCR second

use std::io::Write;
use std::sync::Arc;

use super::ocr::{OcrEngine, TesseractOcr};
use super::parser::{PdfTextLayer, TextLayer};
use super::render::{PageRenderer, PdftoppmRenderer, RenderedPage};
use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::types::{DocumentKind, ExtractedDocument, ExtractionMethod};

/// Inserted between consecutive pages' text
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Turns raw document bytes into text
///
/// Output depends only on the input bytes, the declared kind and the page cap.
pub struct ExtractionPipeline {
    text_layer: Arc<dyn TextLayer>,
    renderer: Arc<dyn PageRenderer>,
    ocr: Arc<dyn OcrEngine>,
    max_pages_ocr: usize,
}

impl ExtractionPipeline {
    /// Create a pipeline from explicit collaborators
    pub fn new(
        text_layer: Arc<dyn TextLayer>,
        renderer: Arc<dyn PageRenderer>,
        ocr: Arc<dyn OcrEngine>,
        max_pages_ocr: usize,
    ) -> Self {
        Self {
            text_layer,
            renderer,
            ocr,
            max_pages_ocr,
        }
    }

    /// Create a pipeline using pdf-extract, pdftoppm and tesseract
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(
            Arc::new(PdfTextLayer::new(config.pdf_timeout())),
            Arc::new(PdftoppmRenderer::new(config.render_dpi, config.ocr_timeout())),
            Arc::new(TesseractOcr::new(
                config.ocr_language.clone(),
                config.ocr_timeout(),
            )),
            config.max_pages_ocr,
        )
    }

    /// Page cap for the OCR pass
    pub fn max_pages_ocr(&self) -> usize {
        self.max_pages_ocr
    }

    /// Check if the OCR engine can run
    pub fn ocr_available(&self) -> bool {
        self.ocr.is_available()
    }

    /// Extract text from a document
    pub fn extract(
        &self,
        data: &[u8],
        kind: DocumentKind,
    ) -> Result<ExtractedDocument, ExtractionError> {
        match kind {
            DocumentKind::Image => self.extract_image(data),
            DocumentKind::Pdf => self.extract_pdf(data),
        }
    }

    fn extract_pdf(&self, data: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
        match self.text_layer.page_texts(data) {
            Ok(pages) => {
                let text = pages.join(PAGE_SEPARATOR);
                if !text.trim().is_empty() {
                    tracing::info!(
                        "Extracted {} characters from {} pages (text layer)",
                        text.len(),
                        pages.len()
                    );
                    return Ok(ExtractedDocument::new(
                        text,
                        ExtractionMethod::Direct,
                        pages.len() as u32,
                    ));
                }
                tracing::info!("PDF has no usable text layer, falling back to OCR");
            }
            Err(e) => {
                tracing::warn!("Native extraction failed: {}, falling back to OCR", e);
            }
        }

        self.extract_pdf_with_ocr(data)
    }

    fn extract_pdf_with_ocr(&self, data: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
        let source = self.renderer.open(data)?;
        self.ensure_ocr()?;

        let total_pages = source.page_count();
        let page_limit = total_pages.min(self.max_pages_ocr);
        if total_pages > page_limit {
            tracing::info!(
                "Document has {} pages, OCR limited to first {}",
                total_pages,
                page_limit
            );
        }

        let mut parts = Vec::with_capacity(page_limit);
        for index in 0..page_limit {
            let page = source.render(index)?;
            let result = self.ocr.recognize(&page);
            page.release();

            let text = result?;
            tracing::debug!("OCR page {}: {} characters", index + 1, text.len());
            parts.push(text);
        }

        let text = parts.join(PAGE_SEPARATOR);
        if text.trim().is_empty() {
            return Err(ExtractionError::NoTextFound);
        }

        tracing::info!(
            "OCR extracted {} characters from {} pages",
            text.len(),
            page_limit
        );
        Ok(ExtractedDocument::new(
            text,
            ExtractionMethod::Ocr,
            page_limit as u32,
        ))
    }

    fn extract_image(&self, data: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
        self.ensure_ocr()?;

        let page = RenderedPage::new(0, stage_image(data)?);
        let result = self.ocr.recognize(&page);
        page.release();

        let text = result?;
        if text.trim().is_empty() {
            return Err(ExtractionError::NoTextFound);
        }

        tracing::info!("Image OCR extracted {} characters", text.len());
        Ok(ExtractedDocument::new(text, ExtractionMethod::Ocr, 1))
    }

    fn ensure_ocr(&self) -> Result<(), ExtractionError> {
        if self.ocr.is_available() {
            Ok(())
        } else {
            Err(ExtractionError::OcrUnavailable(format!(
                "{} is not available",
                self.ocr.name()
            )))
        }
    }
}

/// Write image bytes to a temp file the OCR engine can read
fn stage_image(data: &[u8]) -> Result<tempfile::TempPath, ExtractionError> {
    let stage = || -> std::io::Result<tempfile::TempPath> {
        let mut file = tempfile::Builder::new().prefix("doc-qa-img-").tempfile()?;
        file.write_all(data)?;
        file.flush()?;
        Ok(file.into_temp_path())
    };

    stage().map_err(|e| ExtractionError::OcrUnavailable(format!("Failed to stage image: {}", e)))
}
