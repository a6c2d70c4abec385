//! Error types for the document Q&A system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for doc-qa operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a document produced no text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// Neither the text layer nor the page renderer could read the document
    #[error("Document could not be parsed: {0}")]
    CorruptInput(String),

    /// OCR engine missing, crashed, or timed out
    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    /// Both strategies ran and produced only whitespace
    #[error("No text could be extracted from the document")]
    NoTextFound,
}

/// Document Q&A errors
#[derive(Debug, Error)]
pub enum Error {
    /// Empty or unusable question/context
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Session id failed validation
    #[error("Invalid session ID: {0}")]
    InvalidSession(String),

    /// No document bound to the session
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Text extraction failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Remote inference failed; callers fall back to local answering
    #[error("Remote inference unavailable: {0}")]
    RemoteUnavailable(String),

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a remote unavailable error
    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg.clone()),
            Error::InvalidSession(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_session",
                "Invalid session ID".to_string(),
            ),
            Error::SessionNotFound(_) => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                "No document available for this session".to_string(),
            ),
            Error::Extraction(err) => {
                let (status, kind) = match err {
                    ExtractionError::CorruptInput(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "corrupt_input")
                    }
                    ExtractionError::OcrUnavailable(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "ocr_unavailable")
                    }
                    ExtractionError::NoTextFound => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "no_text_found")
                    }
                };
                (status, kind, err.to_string())
            }
            Error::RemoteUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "remote_unavailable", msg.clone())
            }
            Error::UnsupportedFileType(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("File type not allowed: {}", ext),
            ),
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                "File processing failed".to_string(),
            ),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
