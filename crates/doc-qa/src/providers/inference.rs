//! Remote inference provider trait

use async_trait::async_trait;

use crate::error::Result;

/// A remote service that answers a question from a context passage
///
/// Implementations:
/// - `HuggingFaceClient`: Hugging Face question-answering inference API
/// - `OllamaClient`: Local Ollama server prompted for an extractive answer
///
/// Any failure should be reported as `Error::RemoteUnavailable`; the answer engine
/// treats every error the same way and falls back to local answering.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Answer `question` using only `context`
    async fn answer(&self, question: &str, context: &str) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
