//! Core types for the document Q&A system

pub mod answer;
pub mod document;
pub mod request;

pub use answer::{Answer, AnswerSource, QuestionType};
pub use document::{DocumentKind, ExtractedDocument, ExtractionMethod};
pub use request::{ChatRequest, ChatResponse, CleanupRequest, CleanupResponse, UploadResponse};
