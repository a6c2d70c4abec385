//! API routes for the document Q&A server

pub mod chat;
pub mod cleanup;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload with a body limit sized for documents
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/chat", post(chat::chat))
        .route("/cleanup", post(cleanup::cleanup))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "name": "doc-qa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document Q&A with OCR fallback and grounded answers",
        "endpoints": {
            "POST /api/upload": "Upload a PDF or image (multipart: sessionId, file)",
            "POST /api/chat": "Ask a question about the session's document",
            "POST /api/cleanup": "Discard the session's document and files",
            "GET /api/info": "This document"
        },
        "limits": {
            "max_upload_size": config.server.max_upload_size,
            "max_pages_ocr": state.pipeline().max_pages_ocr(),
            "max_context_length": config.answer.max_context_length,
            "session_ttl_secs": config.session.ttl_secs
        },
        "remote_inference": state.engine().remote_name(),
        "active_sessions": state.registry().len()
    }))
}
