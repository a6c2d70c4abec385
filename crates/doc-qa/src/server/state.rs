//! Application state for the document Q&A server

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::SystemTime;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::generation::AnswerEngine;
use crate::ingestion::{ExtractionPipeline, PdftoppmRenderer};
use crate::providers;
use crate::session::{purge_stale_uploads, SessionRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Text extraction pipeline
    pipeline: Arc<ExtractionPipeline>,
    /// Answer engine (remote provider + local fallback)
    engine: AnswerEngine,
    /// Session id -> extracted document
    registry: Arc<SessionRegistry>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state and start the session sweeper
    pub async fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Initializing document Q&A state...");

        let upload_dir = &config.server.upload_dir;
        tokio::fs::create_dir_all(upload_dir).await.map_err(|e| {
            Error::Config(format!("Failed to create {}: {}", upload_dir.display(), e))
        })?;
        match purge_stale_uploads(upload_dir, config.session.ttl(), SystemTime::now()) {
            Ok(0) => {}
            Ok(n) => tracing::info!("Purged {} stale uploads from {}", n, upload_dir.display()),
            Err(e) => tracing::warn!("Failed to purge {}: {}", upload_dir.display(), e),
        }

        let pipeline = Arc::new(ExtractionPipeline::from_config(&config.extraction));
        if !pipeline.ocr_available() {
            tracing::warn!("tesseract not found; scanned PDFs and images will fail");
        }
        if !PdftoppmRenderer::is_available() {
            tracing::warn!("pdftoppm not found; OCR fallback for PDFs will fail");
        }

        let remote = providers::from_config(&config.inference, config.answer.remote_timeout())?;
        let remote = providers::check_reachable(remote).await;
        let engine = AnswerEngine::new(remote, &config.answer);

        let registry = Arc::new(SessionRegistry::in_memory(config.session.ttl()));
        registry.spawn_sweeper(config.session.sweep_interval());
        tracing::info!(
            "Session sweeper started (ttl {}s, every {}s)",
            config.session.ttl_secs,
            config.session.sweep_interval_secs
        );

        Ok(Self::from_parts(config, pipeline, engine, registry))
    }

    /// Assemble state from prepared components; no background tasks are started
    pub fn from_parts(
        config: AppConfig,
        pipeline: Arc<ExtractionPipeline>,
        engine: AnswerEngine,
        registry: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                engine,
                registry,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get extraction pipeline
    pub fn pipeline(&self) -> &Arc<ExtractionPipeline> {
        &self.inner.pipeline
    }

    /// Get answer engine
    pub fn engine(&self) -> &AnswerEngine {
        &self.inner.engine
    }

    /// Get session registry
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.inner.registry
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state; cleared when the server starts draining
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
