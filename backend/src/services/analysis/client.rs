use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::AnalysisConfig;

use super::extractor;
use super::models::{Analysis, AnalysisError, ChatCompletionResponse};
use super::prompt::SCORING_PROMPT;
use super::registry;

/// Seam for the upstream completion call so the coordinator can be exercised
/// against scripted replies in tests.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Issue one scoring request; returns the model's raw reply text.
    async fn complete(&self, model: &str, document_text: &str) -> Result<String, AnalysisError>;
}

/// Chat-completions client for OpenRouter-compatible endpoints.
pub struct OpenRouterClient {
    http_client: Client,
    config: AnalysisConfig,
}

impl OpenRouterClient {
    pub fn new(config: AnalysisConfig) -> Self {
        // The hard wall-clock deadline lives on the client: expiry aborts the
        // in-flight request. Builder failure at startup is unrecoverable, and
        // a client without the deadline must never be handed out.
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client for the analysis endpoint");

        Self { http_client, config }
    }
}

#[async_trait]
impl CompletionApi for OpenRouterClient {
    async fn complete(&self, model: &str, document_text: &str) -> Result<String, AnalysisError> {
        let url = format!("{}/chat/completions", self.config.api_base);

        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": SCORING_PROMPT },
                { "role": "user", "content": format!("Analyze:\n{}", document_text) },
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.site_url)
            .header("X-Title", "Contract Lens")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Upstream API returned {}: {}", status, error_text);
            return Err(AnalysisError::Upstream(format!(
                "upstream returned {}",
                status.canonical_reason().unwrap_or_else(|| status.as_str())
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        tracing::debug!(
            "Completion received: {} choice(s), content length {}",
            completion.choices.len(),
            completion
                .choices
                .first()
                .and_then(|c| c.message.content.as_deref())
                .map(str::len)
                .unwrap_or(0)
        );

        match completion.choices.into_iter().next().and_then(|c| c.message.content) {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(AnalysisError::EmptyResponse),
        }
    }
}

impl OpenRouterClient {
    /// Deadline expiry can surface while sending or while reading the body;
    /// both become Timeout. Everything else is an upstream transport failure.
    fn map_transport_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            tracing::warn!("Analysis call exceeded {}s deadline", self.config.timeout_secs);
            AnalysisError::Timeout(self.config.timeout_secs)
        } else if e.is_decode() {
            tracing::error!("Malformed upstream response body: {}", e);
            AnalysisError::Upstream(format!("malformed response body: {}", e))
        } else {
            tracing::error!("Analysis request failed: {}", e);
            AnalysisError::Upstream(format!("request failed: {}", e))
        }
    }
}

/// The analysis operation: clean the text, resolve the model, call the
/// completion API once, extract score and risk tier from the reply.
/// No retries; retry policy belongs to the caller.
pub struct AnalysisClient {
    api: Arc<dyn CompletionApi>,
}

impl AnalysisClient {
    pub fn new(api: Arc<dyn CompletionApi>) -> Self {
        Self { api }
    }

    pub async fn analyze(
        &self,
        document_text: &str,
        model_id: &str,
    ) -> Result<Analysis, AnalysisError> {
        let cleaned = clean_document_text(document_text);
        if cleaned.is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        let model = registry::resolve_model(model_id);
        tracing::debug!(
            "Analyzing {} chars with model {} (requested: '{}')",
            cleaned.len(),
            model,
            model_id
        );

        let raw_text = self.api.complete(model, &cleaned).await?;
        let extraction = extractor::extract(&raw_text);

        tracing::info!(
            "Analysis complete: score={} risk={}",
            extraction.score,
            extraction.risk_level.as_str()
        );

        Ok(Analysis {
            raw_text,
            score: extraction.score,
            risk_level: extraction.risk_level,
        })
    }
}

/// Collapse whitespace runs to single spaces (blank lines go with them) to
/// shrink the payload before transmission.
pub fn clean_document_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
