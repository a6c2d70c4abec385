//! Ollama inference client with retry logic

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::InferenceConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

use super::inference::InferenceProvider;

/// Ollama API client with automatic retry
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    /// Maximum retries
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a new Ollama client with retry support
    pub fn new(config: &InferenceConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    /// Model used for generation
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Ollama request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::remote("Unknown Ollama error")))
    }
}

#[async_trait]
impl InferenceProvider for OllamaClient {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let prompt = PromptBuilder::build_extractive_prompt(question, context);
        let model = self.model.clone();
        let temperature = self.temperature;
        let client = self.client.clone();

        tracing::info!("Generating answer with model: {}", model);

        self.retry_request(|| {
            let url = url.clone();
            let prompt = prompt.clone();
            let model = model.clone();
            let client = client.clone();

            async move {
                let request = GenerateRequest {
                    model,
                    prompt,
                    stream: false,
                    options: GenerateOptions { temperature },
                };

                let response = client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::remote(format!("Generation request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::remote(format!(
                        "Generation failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let generate_response: GenerateResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::remote(format!("Failed to parse generation response: {}", e)))?;

                Ok(generate_response.response.trim().to_string())
            }
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client(max_retries: u32) -> OllamaClient {
        let config = InferenceConfig {
            // Port 9 (discard) is closed on test machines; connect fails fast
            ollama_url: "http://127.0.0.1:9/".to_string(),
            max_retries,
            ..Default::default()
        };
        OllamaClient::new(&config, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_client_from_config() {
        let client = unreachable_client(0);
        assert_eq!(client.model(), "phi3");
        assert_eq!(client.base_url, "http://127.0.0.1:9");
        assert_eq!(client.name(), "ollama");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = unreachable_client(0);
        assert!(!client.health_check().await.unwrap());

        let err = client.answer("question", "context").await.unwrap_err();
        assert!(matches!(err, Error::RemoteUnavailable(_)));
    }
}
