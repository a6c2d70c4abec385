//! HTTP server for document Q&A

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Document Q&A HTTP server
pub struct DocQaServer {
    config: AppConfig,
    state: AppState,
}

impl DocQaServer {
    /// Create a new server, initializing state from configuration
    pub async fn new(config: AppConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Create a server around existing state
    pub fn from_state(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            // Health check
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .nest("/api", routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting document Q&A server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(self.state.clone()))
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Wait for Ctrl-C, then report not-ready while in-flight requests drain
async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining requests");
    state.set_ready(false);
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::generation::AnswerEngine;
    use crate::ingestion::{
        ExtractionPipeline, OcrEngine, PageRenderer, PageSource, RenderedPage, TextLayer,
    };
    use crate::session::SessionRegistry;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const SESSION: &str = "test-session-0001";
    const BOUNDARY: &str = "doc-qa-test-boundary";

    struct FixedText;

    impl TextLayer for FixedText {
        fn page_texts(&self, _data: &[u8]) -> std::result::Result<Vec<String>, ExtractionError> {
            Ok(vec!["The sky is blue. The grass is green.".to_string()])
        }
    }

    struct NoRenderer;

    impl PageRenderer for NoRenderer {
        fn open(&self, _data: &[u8]) -> std::result::Result<Box<dyn PageSource>, ExtractionError> {
            Err(ExtractionError::CorruptInput("no renderer".to_string()))
        }
    }

    struct NoOcr;

    impl OcrEngine for NoOcr {
        fn recognize(&self, _page: &RenderedPage) -> std::result::Result<String, ExtractionError> {
            Err(ExtractionError::OcrUnavailable("not installed".to_string()))
        }

        fn is_available(&self) -> bool {
            false
        }

        fn name(&self) -> &str {
            "none"
        }
    }

    /// Text layer that only reads uploads starting with `GOOD`
    struct PickyText;

    impl TextLayer for PickyText {
        fn page_texts(&self, data: &[u8]) -> std::result::Result<Vec<String>, ExtractionError> {
            if data.starts_with(b"GOOD") {
                Ok(vec!["The sky is blue.".to_string()])
            } else {
                Err(ExtractionError::CorruptInput("unreadable".to_string()))
            }
        }
    }

    fn test_state(upload_dir: &TempDir, text_layer: Arc<dyn TextLayer>) -> AppState {
        let mut config = AppConfig::default();
        config.server.upload_dir = upload_dir.path().to_path_buf();

        let pipeline = Arc::new(ExtractionPipeline::new(
            text_layer,
            Arc::new(NoRenderer),
            Arc::new(NoOcr),
            config.extraction.max_pages_ocr,
        ));
        let engine = AnswerEngine::new(None, &config.answer);
        let registry = Arc::new(SessionRegistry::in_memory(Duration::from_secs(3600)));

        AppState::from_parts(config, pipeline, engine, registry)
    }

    fn test_app(upload_dir: &TempDir) -> Router {
        DocQaServer::from_state(test_state(upload_dir, Arc::new(FixedText))).build_router()
    }

    fn upload_request(session_id: &str, filename: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"sessionId\"\r\n\r\n{sid}\r\n\
                 --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                b = BOUNDARY,
                sid = session_id,
                name = filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn stored_files(dir: &TempDir) -> Vec<String> {
        std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_while_draining() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Arc::new(FixedText));
        let app = DocQaServer::from_state(state.clone()).build_router();

        state.set_ready(false);
        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_upload_chat_cleanup() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let response = app
            .clone()
            .oneshot(upload_request(SESSION, "my report.pdf", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["method"], "direct");
        assert_eq!(body["isImage"], false);
        assert_eq!(body["pagesProcessed"], 1);

        let files = stored_files(&dir);
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with(&format!("{}_", SESSION)));
        assert!(files[0].ends_with("_my_report.pdf"));
        assert_eq!(body["filename"], files[0].as_str());

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/chat",
                serde_json::json!({"query": "What color is the sky?", "sessionId": SESSION}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["source"], "local");
        assert!(body["answer"].as_str().unwrap().contains("sky is blue"));

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/cleanup",
                serde_json::json!({"sessionId": SESSION}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);
        assert!(stored_files(&dir).is_empty());

        let response = app
            .oneshot(json_request(
                "/api/chat",
                serde_json::json!({"query": "What color is the sky?", "sessionId": SESSION}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_reupload_keeps_live_file() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Arc::new(PickyText));
        let app = DocQaServer::from_state(state.clone()).build_router();

        let response = app
            .clone()
            .oneshot(upload_request(SESSION, "doc.pdf", b"GOOD pdf"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let first_name = body_json(response).await["filename"]
            .as_str()
            .unwrap()
            .to_string();

        // Same session and name, within the same second
        let response = app
            .clone()
            .oneshot(upload_request(SESSION, "doc.pdf", b"BROKEN"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let record = state.registry().lookup(SESSION).unwrap();
        assert_eq!(record.document.text, "The sky is blue.");
        assert_eq!(record.backing_files.len(), 1);
        assert!(record.backing_files[0].exists());
        assert_eq!(std::fs::read(&record.backing_files[0]).unwrap(), b"GOOD pdf");
        assert_eq!(stored_files(&dir), vec![first_name]);

        let response = app
            .oneshot(json_request(
                "/api/chat",
                serde_json::json!({"query": "What color is the sky?", "sessionId": SESSION}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_same_name_uploads_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let mut names = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(upload_request(SESSION, "doc.pdf", b"%PDF-1.4"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            names.push(body_json(response).await["filename"].as_str().unwrap().to_string());
        }

        assert_ne!(names[0], names[1]);
        // The rebind retired the first upload
        assert_eq!(stored_files(&dir), vec![names[1].clone()]);
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let response = app
            .clone()
            .oneshot(upload_request("bad id", "doc.pdf", b"%PDF"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(upload_request(SESSION, "setup.exe", b"MZ"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["type"], "unsupported_type");

        let response = app
            .oneshot(upload_request(SESSION, "scan.png", b"\x89PNG"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"]["type"], "ocr_unavailable");

        assert!(stored_files(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejections() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/chat",
                serde_json::json!({"query": "Anything?", "sessionId": "never-uploaded-1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/chat",
                serde_json::json!({"query": "Anything?", "sessionId": "x"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "/api/chat",
                serde_json::json!({"query": "  ", "sessionId": SESSION}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cleanup_unknown_session_succeeds() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(json_request(
                "/api/cleanup",
                serde_json::json!({"sessionId": "never-uploaded-1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_info() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(Request::get("/api/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "doc-qa");
        assert_eq!(body["limits"]["max_pages_ocr"], 10);
        assert!(body["remote_inference"].is_null());
    }
}
