//! HTTP request/response types and error mapping

use crate::chain::{ChainError, ChainProgress, Phase, TeachingChain};
use crate::error::ElaraError;
use crate::matching::{AnswerSet, CalibrationQuestion, MatchError};
use crate::personas::TutorPersona;
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Machine-readable error codes
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INCOMPLETE_CALIBRATION: &str = "INCOMPLETE_CALIBRATION";
    pub const UNKNOWN_TUTOR: &str = "UNKNOWN_TUTOR";
    pub const UNKNOWN_CHAIN: &str = "UNKNOWN_CHAIN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ApiFailure = (StatusCode, Json<ApiError>);

/// Map a service error onto a status code and error body
pub fn error_response(err: ElaraError) -> ApiFailure {
    let (status, code) = match &err {
        ElaraError::Matching(MatchError::InvalidAnswer { .. }) | ElaraError::InvalidRequest(_) => {
            (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR)
        }
        ElaraError::IncompleteCalibration { .. } => {
            (StatusCode::BAD_REQUEST, error_codes::INCOMPLETE_CALIBRATION)
        }
        ElaraError::UnknownTutor(_) => (StatusCode::BAD_REQUEST, error_codes::UNKNOWN_TUTOR),
        ElaraError::Chain(ChainError::UnknownChain(_)) => {
            (StatusCode::NOT_FOUND, error_codes::UNKNOWN_CHAIN)
        }
        ElaraError::Llm(_) => (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR),
    };

    (status, Json(ApiError::new(code, err.to_string())))
}

pub fn not_found(message: impl Into<String>) -> ApiFailure {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(error_codes::NOT_FOUND, message)),
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TutorListResponse {
    pub tutors: Vec<TutorPersona>,
}

/// Public view of a teaching chain
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Distinct tutors in phase order
    pub styles: Vec<String>,
    pub phases: Vec<Phase>,
}

impl From<&TeachingChain> for ChainSummary {
    fn from(chain: &TeachingChain) -> Self {
        Self {
            id: chain.id.clone(),
            name: chain.name.clone(),
            description: chain.description.clone(),
            styles: chain.styles().into_iter().map(str::to_string).collect(),
            phases: chain.phases.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChainListResponse {
    pub chains: Vec<ChainSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    pub questions: Vec<CalibrationQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalibrationRequest {
    pub user_id: String,
    pub answers: AnswerSet,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartChainRequest {
    pub chain_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AbandonChainResponse {
    /// Progress that was cleared, if a chain was active
    pub abandoned: Option<ChainProgress>,
}
