//! Session cleanup endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{CleanupRequest, CleanupResponse};

/// POST /api/cleanup - Discard a session's document and files
///
/// Succeeds for sessions that were never bound or already expired.
pub async fn cleanup(
    State(state): State<AppState>,
    Json(request): Json<CleanupRequest>,
) -> Result<Json<CleanupResponse>> {
    if !state.registry().evict(&request.session_id)? {
        tracing::debug!("Cleanup for unknown session {}", request.session_id);
    }
    Ok(Json(CleanupResponse { success: true }))
}
