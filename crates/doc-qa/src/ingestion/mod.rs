//! Document ingestion: text layer, page rendering and OCR
//!
//! PDFs are read through their embedded text layer first. When that yields nothing
//! usable the pages are rasterized one at a time and passed to the OCR engine, up to
//! the configured page cap. Images go straight to OCR.

mod ocr;
mod parser;
mod pipeline;
mod render;
pub mod tools;

pub use ocr::{OcrEngine, TesseractOcr};
pub use parser::{PdfTextLayer, TextLayer};
pub use pipeline::{ExtractionPipeline, PAGE_SEPARATOR};
pub use render::{PageRenderer, PageSource, PdftoppmRenderer, RenderedPage};
