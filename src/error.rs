//! Error types for the ELARA tutoring service
//!
//! Each engine owns a narrow error enum; `ElaraError` wraps them for the
//! orchestration and API layers.

use crate::chain::ChainError;
use crate::llm::LlmError;
use crate::matching::MatchError;
use thiserror::Error;

/// Main error type for ELARA operations
#[derive(Error, Debug)]
pub enum ElaraError {
    /// Calibration scoring failed
    #[error(transparent)]
    Matching(#[from] MatchError),

    /// Teaching chain lookup or validation failed
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// LLM collaborator failed
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Tutor id not present in the persona registry
    #[error("Unknown tutor: {0}")]
    UnknownTutor(String),

    /// Calibration submitted before every question was answered
    #[error("Incomplete calibration: {answered} of {total} questions answered")]
    IncompleteCalibration { answered: usize, total: usize },

    /// Malformed request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Persistence collaborator failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration source could not be read
    #[error("Configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ELARA operations
pub type Result<T> = std::result::Result<T, ElaraError>;
