//! Hugging Face question-answering inference client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::InferenceConfig;
use crate::error::{Error, Result};

use super::inference::InferenceProvider;

/// Client for the hosted question-answering pipeline
pub struct HuggingFaceClient {
    client: Client,
    endpoint: String,
    token: String,
}

#[derive(Serialize)]
struct QaRequest<'a> {
    inputs: QaInputs<'a>,
}

#[derive(Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct QaResponse {
    answer: Option<String>,
    score: Option<f64>,
    error: Option<String>,
}

impl HuggingFaceClient {
    /// Create a client for the configured model
    pub fn new(config: &InferenceConfig, token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/{}",
                config.hf_api_url.trim_end_matches('/'),
                config.hf_model
            ),
            token,
        })
    }

    /// Endpoint the client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Extract the answer text from a response body
fn parse_response(body: QaResponse) -> Result<String> {
    if let Some(error) = body.error {
        return Err(Error::remote(format!("Hugging Face error: {}", error)));
    }

    match body.answer {
        Some(answer) => {
            tracing::info!("Hugging Face answer, score {:.3}", body.score.unwrap_or(0.0));
            Ok(answer)
        }
        None => Err(Error::remote("Hugging Face response has no answer")),
    }
}

#[async_trait]
impl InferenceProvider for HuggingFaceClient {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let request = QaRequest {
            inputs: QaInputs { question, context },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::remote(format!("Hugging Face request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::remote(format!(
                "Hugging Face request failed: HTTP {} - {}",
                status, body
            )));
        }

        let body: QaResponse = response
            .json()
            .await
            .map_err(|e| Error::remote(format!("Failed to parse Hugging Face response: {}", e)))?;

        parse_response(body)
    }

    async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.token)
            .send()
            .await
        {
            // The QA endpoint only accepts POST; any reply short of an auth or server error is up
            Ok(response) => {
                let status = response.status();
                Ok(!(status.is_server_error()
                    || status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN))
            }
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
