//! Question answering endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /api/chat - Answer a question against the session's document
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();

    if request.query.trim().is_empty() {
        return Err(Error::invalid_input("No query provided"));
    }

    let record = state.registry().lookup(&request.session_id)?;
    let answer = state
        .engine()
        .answer(&request.query, &record.document.text)
        .await?;

    tracing::info!(
        "Session {}: {:?} answer in {}ms",
        record.session_id,
        answer.source,
        start.elapsed().as_millis()
    );

    Ok(Json(answer.into()))
}
