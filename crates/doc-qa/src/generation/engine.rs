//! Answer engine: remote inference with a deterministic local fallback

use std::sync::Arc;
use std::time::Duration;

use super::local::LocalAnswerer;
use super::sanitize::{sanitize_text, truncate_chars};
use crate::config::AnswerConfig;
use crate::error::{Error, Result};
use crate::providers::InferenceProvider;
use crate::types::Answer;

/// Answers questions against a document's text
pub struct AnswerEngine {
    remote: Option<Arc<dyn InferenceProvider>>,
    local: LocalAnswerer,
    max_context_length: usize,
    remote_timeout: Duration,
}

impl AnswerEngine {
    /// Create an engine; `remote` is `None` when no provider could be configured
    pub fn new(remote: Option<Arc<dyn InferenceProvider>>, config: &AnswerConfig) -> Self {
        Self {
            remote,
            local: LocalAnswerer::new(config.max_answer_sentence_chars),
            max_context_length: config.max_context_length,
            remote_timeout: config.remote_timeout(),
        }
    }

    /// Override the remote call timeout
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Name of the remote provider, if any
    pub fn remote_name(&self) -> Option<&str> {
        self.remote.as_ref().map(|p| p.name())
    }

    /// Answer a question using only `context`
    ///
    /// Fails only on empty input. Every remote failure falls back to the local heuristic.
    pub async fn answer(&self, question: &str, context: &str) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(Error::invalid_input("Question is empty"));
        }
        if context.trim().is_empty() {
            return Err(Error::invalid_input("Document text is empty"));
        }

        let question = sanitize_text(question);
        let context = sanitize_text(context);
        if question.is_empty() || context.is_empty() {
            return Err(Error::invalid_input("Input is empty after sanitization"));
        }
        let context = truncate_chars(&context, self.max_context_length);

        if let Some(remote) = &self.remote {
            match self.ask_remote(remote.as_ref(), &question, context).await {
                Ok(answer) => return Ok(answer),
                Err(e) => tracing::warn!("{}, using local fallback", e),
            }
        }

        let mut answer = self.local.answer(&question, context);
        answer.text = sanitize_text(&answer.text);
        tracing::info!("Local answer for {:?}: score {:?}", question, answer.score);
        Ok(answer)
    }

    async fn ask_remote(
        &self,
        remote: &dyn InferenceProvider,
        question: &str,
        context: &str,
    ) -> Result<Answer> {
        let text = tokio::time::timeout(self.remote_timeout, remote.answer(question, context))
            .await
            .map_err(|_| {
                Error::remote(format!(
                    "{} timed out after {:?}",
                    remote.name(),
                    self.remote_timeout
                ))
            })??;

        let text = sanitize_text(&text);
        if text.is_empty() {
            return Err(Error::remote(format!("{} returned an empty answer", remote.name())));
        }

        tracing::info!("Remote answer from {} for {:?}", remote.name(), question);
        Ok(Answer::remote(text))
    }
}
