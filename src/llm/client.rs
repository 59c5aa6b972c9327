//! Gemini text-completion client with retry and circuit breaker

use super::circuit_breaker::CircuitBreaker;
use super::config::LlmConfig;
use crate::metrics::METRICS;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// LLM collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM integration is disabled")]
    Disabled,

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Circuit breaker is open")]
    CircuitOpen,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

impl LlmError {
    /// Transport and upstream failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RequestFailed(_) | LlmError::Timeout(_) | LlmError::Upstream(_)
        )
    }
}

/// Black-box text completion: prompt parts in, reply text out
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt_parts: &[String]) -> Result<String, LlmError>;
}

/// Client for the `generateContent` endpoint
pub struct GeminiClient {
    http: Client,
    config: LlmConfig,
    breaker: CircuitBreaker,
}

impl GeminiClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let breaker = CircuitBreaker::new(
            config.circuit_breaker_failures,
            config.breaker_reset_timeout(),
        );

        Ok(Self {
            http,
            config,
            breaker,
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    async fn call_generate_api(&self, prompt_parts: &[String]) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_ref().ok_or(LlmError::MissingApiKey)?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        );

        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: prompt_parts
                    .iter()
                    .map(|text| Part { text: Some(text.clone()) })
                    .collect(),
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        debug!("Calling Gemini generateContent: {} prompt parts", prompt_parts.len());

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key.expose_secret().as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(e.to_string())
                } else {
                    LlmError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = format!("Status {}: {}", status, error_text);
            // 4xx other than rate limiting will not succeed on retry
            if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::Rejected(message));
            }
            return Err(LlmError::Upstream(message));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed.into_text()
    }

    /// Exponential backoff for the given 1-based attempt
    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let base = self.config.retry_backoff();
        let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1) as u32);
        base.saturating_mul(multiplier)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt_parts: &[String]) -> Result<String, LlmError> {
        if !self.config.enabled {
            METRICS.record_llm_request("disabled");
            return Err(LlmError::Disabled);
        }

        if !self.breaker.allow() {
            METRICS.record_llm_request("circuit_open");
            error!("Circuit breaker is open for Gemini completions");
            return Err(LlmError::CircuitOpen);
        }

        let start = Instant::now();
        let mut attempt = 0;
        let result = loop {
            attempt += 1;

            match self.call_generate_api(prompt_parts).await {
                Ok(text) => {
                    self.breaker.record_success();
                    METRICS.record_llm_request("success");
                    break Ok(text);
                }
                Err(e) => {
                    METRICS.record_llm_request("error");
                    if e.is_retryable() {
                        self.breaker.record_failure();
                    }

                    if !e.is_retryable() || attempt > self.config.retry_attempts {
                        error!("Completion failed after {} attempts: {}", attempt, e);
                        break Err(e);
                    }

                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        "Completion attempt {} failed: {}, retrying in {:?}",
                        attempt, e, backoff
                    );
                    tokio::time::sleep(backoff).await;

                    if !self.breaker.allow() {
                        warn!("Circuit breaker opened while retrying: {}", e);
                        break Err(e);
                    }
                }
            }
        };

        METRICS
            .llm_request_duration
            .with_label_values(&[self.config.model.as_str()])
            .observe(start.elapsed().as_secs_f64());

        result
    }
}

// Wire types for generateContent
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Result<String, LlmError> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or(LlmError::EmptyResponse)?;

        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}
