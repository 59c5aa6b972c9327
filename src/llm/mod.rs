//! LLM collaborator
//!
//! The orchestrator only sees [`LlmClient`]; [`GeminiClient`] is the HTTP
//! implementation used by the server binary.

pub mod circuit_breaker;
pub mod client;
pub mod config;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use client::{GeminiClient, LlmClient, LlmError};
pub use config::LlmConfig;
