//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

use super::answer::{Answer, AnswerSource};
use super::document::{ExtractedDocument, ExtractionMethod};

/// Response for `POST /api/upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Extracted text, sanitized for display
    pub text: String,
    /// Stored filename
    pub filename: String,
    /// Whether the upload was an image
    pub is_image: bool,
    /// Extraction strategy that produced the text
    pub method: ExtractionMethod,
    /// Pages read
    pub pages_processed: u32,
}

impl UploadResponse {
    /// Build a response from an extraction result
    pub fn new(document: &ExtractedDocument, filename: String, is_image: bool) -> Self {
        Self {
            text: crate::generation::sanitize::sanitize_text(&document.text),
            filename,
            is_image,
            method: document.method,
            pages_processed: document.pages_processed,
        }
    }
}

/// Request for `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The question
    #[serde(default)]
    pub query: String,
    /// Session the document was uploaded under
    #[serde(default)]
    pub session_id: String,
}

/// Response for `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Answer text
    pub answer: String,
    /// Answering strategy
    pub source: AnswerSource,
    /// Keyword overlap (local answers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl From<Answer> for ChatResponse {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.text,
            source: answer.source,
            score: answer.score,
        }
    }
}

/// Request for `POST /api/cleanup`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequest {
    #[serde(default)]
    pub session_id: String,
}

/// Response for `POST /api/cleanup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub success: bool,
}
