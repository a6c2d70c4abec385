//! Remote inference providers
//!
//! The answer engine talks to an [`InferenceProvider`]; which one is built is decided by
//! [`InferenceConfig::backend`].

mod huggingface;
mod inference;
mod ollama;

pub use huggingface::HuggingFaceClient;
pub use inference::InferenceProvider;
pub use ollama::OllamaClient;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{InferenceBackend, InferenceConfig};
use crate::error::Result;

/// Build the configured provider, or `None` when remote inference is off
///
/// The Hugging Face backend without a token counts as off.
pub fn from_config(
    config: &InferenceConfig,
    timeout: Duration,
) -> Result<Option<Arc<dyn InferenceProvider>>> {
    let provider: Arc<dyn InferenceProvider> = match config.backend {
        InferenceBackend::Disabled => {
            tracing::info!("Remote inference disabled, answering locally");
            return Ok(None);
        }
        InferenceBackend::HuggingFace => {
            let Some(token) = config.hf_token.clone().filter(|t| !t.trim().is_empty()) else {
                tracing::warn!("HF_TOKEN not set, answering locally");
                return Ok(None);
            };
            Arc::new(HuggingFaceClient::new(config, token, timeout)?)
        }
        InferenceBackend::Ollama => Arc::new(OllamaClient::new(config, timeout)?),
    };

    tracing::info!("Remote inference provider: {}", provider.name());
    Ok(Some(provider))
}

/// Keep the provider only if it answers its health check
///
/// An unreachable backend at startup means every question is answered locally.
pub async fn check_reachable(
    provider: Option<Arc<dyn InferenceProvider>>,
) -> Option<Arc<dyn InferenceProvider>> {
    let provider = provider?;
    match provider.health_check().await {
        Ok(true) => Some(provider),
        Ok(false) => {
            tracing::warn!("{} is not reachable, answering locally", provider.name());
            None
        }
        Err(e) => {
            tracing::warn!("{} health check failed: {}, answering locally", provider.name(), e);
            None
        }
    }
}
