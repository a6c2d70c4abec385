//! Configuration for the document Q&A system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Text extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Answer engine configuration
    #[serde(default)]
    pub answer: AnswerConfig,
    /// Remote inference configuration
    #[serde(default)]
    pub inference: InferenceConfig,
    /// Session registry configuration
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration: defaults, then an optional TOML file, then environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML configuration text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Override settings from environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("HF_TOKEN").filter(|t| !t.trim().is_empty()) {
            self.inference.hf_token = Some(token);
        }
        if let Some(dir) = lookup("UPLOAD_FOLDER") {
            self.server.upload_dir = PathBuf::from(dir);
        }
        if let Some(size) = lookup("MAX_FILE_SIZE").and_then(|s| s.parse().ok()) {
            self.server.max_upload_size = size;
        }
        if let Some(host) = lookup("DOCQA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DOCQA_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.inference.ollama_url = url;
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 16MB)
    pub max_upload_size: usize,
    /// Directory for uploaded files
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            enable_cors: true,
            max_upload_size: 16 * 1024 * 1024, // 16MB
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum pages rasterized for OCR
    pub max_pages_ocr: usize,
    /// Render resolution for OCR
    pub render_dpi: u32,
    /// Tesseract language code
    pub ocr_language: String,
    /// Limit for one pdftoppm or tesseract invocation
    pub ocr_timeout_secs: u64,
    /// Limit for native PDF text extraction
    pub pdf_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_pages_ocr: 10,
            render_dpi: 150, // Good balance of quality and speed
            ocr_language: "eng".to_string(),
            ocr_timeout_secs: 60,
            pdf_timeout_secs: 60,
        }
    }
}

impl ExtractionConfig {
    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr_timeout_secs)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }
}

/// Answer engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Context prefix kept, in characters
    pub max_context_length: usize,
    /// Cap on the quoted sentence in local answers, in characters
    pub max_answer_sentence_chars: usize,
    /// Deadline for one remote call, retries included
    pub remote_timeout_secs: u64,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            max_context_length: 2000,
            max_answer_sentence_chars: 300,
            remote_timeout_secs: 30,
        }
    }
}

impl AnswerConfig {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }
}

/// Remote inference backend selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum InferenceBackend {
    /// Hugging Face hosted question answering
    #[default]
    HuggingFace,
    /// Local Ollama server
    Ollama,
    /// No remote inference; always answer locally
    Disabled,
}

/// Remote inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Backend to use
    pub backend: InferenceBackend,
    /// Hugging Face API token (usually from `HF_TOKEN`)
    pub hf_token: Option<String>,
    /// Hugging Face inference API base URL
    pub hf_api_url: String,
    /// Hugging Face question-answering model
    pub hf_model: String,
    /// Ollama base URL
    pub ollama_url: String,
    /// Ollama generation model
    pub ollama_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: InferenceBackend::default(),
            hf_token: None,
            hf_api_url: "https://api-inference.huggingface.co/models".to_string(),
            hf_model: "distilbert/distilbert-base-cased-distilled-squad".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "phi3".to_string(),
            temperature: 0.1, // Extractive answers
            max_retries: 1,
        }
    }
}

/// Session registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Record lifetime in seconds
    pub ttl_secs: u64,
    /// Period of the background sweep in seconds
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600, // 1 hour
            sweep_interval_secs: 300,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
