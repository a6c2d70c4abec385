//! doc-qa: Document question answering with OCR fallback
//!
//! Upload a PDF or image, get its plain text, and ask questions against it. Text comes
//! from the PDF text layer when one exists and from page-by-page OCR otherwise. Answers
//! come from a remote inference service when it is reachable and from a deterministic
//! lexical heuristic when it is not. Extracted text is bound to a caller's session and
//! swept, together with the uploaded files, after a TTL.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, ExtractionError, Result};
pub use generation::AnswerEngine;
pub use ingestion::ExtractionPipeline;
pub use session::{SessionId, SessionRecord, SessionRegistry};
pub use types::{
    answer::{Answer, AnswerSource, QuestionType},
    document::{DocumentKind, ExtractedDocument, ExtractionMethod},
};
