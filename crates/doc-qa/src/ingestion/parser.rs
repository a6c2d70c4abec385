//! Native PDF text-layer extraction

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::ExtractionError;

/// Source of per-page text from a document's embedded text layer
pub trait TextLayer: Send + Sync {
    /// Text of every page, in page order
    ///
    /// Pages without a text layer yield empty strings; an unreadable document is
    /// `CorruptInput`.
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Normalize characters PDF fonts commonly emit
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ") // Non-breaking space -> space
        .replace('\u{FB01}', "fi") // fi ligature -> separate chars
        .replace('\u{FB02}', "fl") // fl ligature -> separate chars
        .replace('\u{FB00}', "ff") // ff ligature -> separate chars
        .replace('\u{FB03}', "ffi") // ffi ligature -> separate chars
        .replace('\u{FB04}', "ffl") // ffl ligature -> separate chars
}

/// Text layer backed by pdf-extract, with lopdf as fallback
pub struct PdfTextLayer {
    timeout: Duration,
}

impl PdfTextLayer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run pdf-extract on its own thread so a pathological font can't hang the request
    fn extract_with_timeout(&self, data: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem_by_pages(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(pages)) => {
                let _ = handle.join();
                Ok(pages)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("pdf-extract failed: {}, trying lopdf", e);
                Self::extract_with_lopdf(data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Thread keeps running; nothing waits on it
                tracing::error!(
                    "PDF extraction timeout after {}s, trying lopdf",
                    self.timeout.as_secs()
                );
                Self::extract_with_lopdf(data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed, trying lopdf");
                Self::extract_with_lopdf(data)
            }
        }
    }

    /// Page-by-page extraction using lopdf directly
    fn extract_with_lopdf(data: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| ExtractionError::CorruptInput(format!("Failed to load PDF: {}", e)))?;

        let pages = doc
            .get_pages()
            .into_keys()
            .map(|page_number| match doc.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!("No text for page {}: {}", page_number, e);
                    String::new()
                }
            })
            .collect();

        Ok(pages)
    }
}

impl Default for PdfTextLayer {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl TextLayer for PdfTextLayer {
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let pages = self.extract_with_timeout(data)?;
        Ok(pages.iter().map(|page| cleanup_pdf_text(page)).collect())
    }
}
