//! Configuration for the Gemini text-completion collaborator

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// LLM client configuration
#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    /// Disable to make every completion fail fast
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Base URL of the generative language API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (read from env GEMINI_API_KEY if not set)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first failed attempt
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,

    /// Base backoff in milliseconds, doubled per retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Consecutive failures before the breaker opens
    #[serde(default = "default_breaker_failures")]
    pub circuit_breaker_failures: usize,

    /// Seconds before an open breaker lets a probe through
    #[serde(default = "default_breaker_reset")]
    pub circuit_breaker_reset_secs: u64,
}

fn default_enabled() -> bool { true }
fn default_api_url() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_model() -> String { "gemini-2.0-flash".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_top_k() -> u32 { 40 }
fn default_top_p() -> f32 { 0.95 }
fn default_max_output_tokens() -> u32 { 2048 }
fn default_timeout_ms() -> u64 { 30_000 }
fn default_retry_attempts() -> usize { 1 }
fn default_retry_backoff_ms() -> u64 { 250 }
fn default_breaker_failures() -> usize { 5 }
fn default_breaker_reset() -> u64 { 30 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_url: default_api_url(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            circuit_breaker_failures: default_breaker_failures(),
            circuit_breaker_reset_secs: default_breaker_reset(),
        }
    }
}

impl LlmConfig {
    /// Override with environment variables if present
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            if !val.is_empty() {
                self.api_key = Some(SecretString::new(val));
            }
        }

        if let Ok(val) = std::env::var("GEMINI_MODEL") {
            self.model = val;
        }

        if let Ok(val) = std::env::var("GEMINI_API_URL") {
            self.api_url = val;
        }

        if let Ok(val) = std::env::var("LLM_ENABLED") {
            self.enabled = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("LLM_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("LLM_MAX_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.retry_attempts = retries;
            }
        }

        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn breaker_reset_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_reset_secs)
    }
}
