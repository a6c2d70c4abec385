//! Document upload endpoint

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::session::{remove_backing_files, secure_filename, SessionId};
use crate::types::{DocumentKind, UploadResponse};

/// POST /api/upload - Store a document, extract its text and bind it to the session
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();
    let mut session_id: Option<String> = None;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::invalid_input(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "sessionId" => {
                let value = field.text().await.map_err(|e| {
                    Error::invalid_input(format!("Failed to read sessionId: {}", e))
                })?;
                session_id = Some(value);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    Error::invalid_input(format!("Failed to read file: {}", e))
                })?;
                upload = Some((filename, data));
            }
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    let session_id = SessionId::parse(session_id.as_deref().unwrap_or(""))?;
    let (original_name, data) = upload.ok_or_else(|| Error::invalid_input("No file provided"))?;
    if data.is_empty() {
        return Err(Error::invalid_input("Uploaded file is empty"));
    }

    let filename =
        secure_filename(&original_name).ok_or_else(|| Error::invalid_input("Invalid filename"))?;
    let kind = DocumentKind::from_filename(&filename).ok_or_else(|| {
        let ext = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        Error::UnsupportedFileType(ext.to_string())
    })?;

    let (path, stored_name) = store_upload(&state, &session_id, &filename, data.clone()).await?;
    tracing::info!(
        "Session {}: stored {} ({} bytes, {})",
        session_id,
        stored_name,
        data.len(),
        kind.display_name()
    );

    let pipeline = state.pipeline().clone();
    let extracted = tokio::task::spawn_blocking(move || pipeline.extract(&data, kind))
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)));

    let document = match extracted {
        Ok(Ok(document)) => document,
        Ok(Err(e)) => {
            remove_backing_files(&[path]);
            tracing::warn!("Session {}: extraction failed: {}", session_id, e);
            return Err(e.into());
        }
        Err(e) => {
            remove_backing_files(&[path]);
            return Err(e);
        }
    };

    let record = state
        .registry()
        .bind(session_id.as_str(), document, vec![path])?;

    tracing::info!(
        "Session {}: extracted {} characters ({:?}, {} pages) in {}ms",
        session_id,
        record.document.char_count(),
        record.document.method,
        record.document.pages_processed,
        start.elapsed().as_millis()
    );

    Ok(Json(UploadResponse::new(
        &record.document,
        stored_name,
        kind.is_image(),
    )))
}

/// Write the upload under `upload_dir` as `{session}_{unix_ts}_{random}_{name}`
///
/// The random component is created exclusively, so two uploads never share a path.
/// Returns the path and the stored file name.
async fn store_upload(
    state: &AppState,
    session_id: &SessionId,
    filename: &str,
    data: Bytes,
) -> Result<(PathBuf, String)> {
    let upload_dir = state.config().server.upload_dir.clone();
    let prefix = format!("{}_{}_", session_id, chrono::Utc::now().timestamp());
    let suffix = format!("_{}", filename);

    tokio::task::spawn_blocking(move || -> Result<(PathBuf, String)> {
        std::fs::create_dir_all(&upload_dir)?;
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&upload_dir)?;
        file.write_all(&data)?;
        let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;

        let stored_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok((path, stored_name))
    })
    .await
    .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
}
