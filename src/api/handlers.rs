//! API handlers

use super::models::*;
use crate::chain::ChainProgress;
use crate::metrics::METRICS;
use crate::session::{CalibrationRecord, ChatReply, ChatRequest, ConversationRecord, SessionOrchestrator};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SessionOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<SessionOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}

/// GET /api/v1/tutors
pub async fn list_tutors(State(state): State<AppState>) -> Json<TutorListResponse> {
    Json(TutorListResponse {
        tutors: state.orchestrator.registry().iter().cloned().collect(),
    })
}

/// GET /api/v1/chains
pub async fn list_chains(State(state): State<AppState>) -> Json<ChainListResponse> {
    Json(ChainListResponse {
        chains: state.orchestrator.chains().chains().map(ChainSummary::from).collect(),
    })
}

/// GET /api/v1/calibration/questions
pub async fn calibration_questions(State(state): State<AppState>) -> Json<QuestionnaireResponse> {
    Json(QuestionnaireResponse {
        questions: state.orchestrator.matching().questionnaire().questions().to_vec(),
    })
}

/// Score a calibration
///
/// POST /api/v1/calibration
pub async fn submit_calibration(
    State(state): State<AppState>,
    Json(request): Json<CalibrationRequest>,
) -> Result<Json<CalibrationRecord>, ApiFailure> {
    info!(
        "Calibration request: user={}, {} answers",
        request.user_id,
        request.answers.len()
    );

    state
        .orchestrator
        .calibrate(&request.user_id, request.answers)
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/v1/calibration/:user_id
pub async fn get_calibration(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CalibrationRecord>, ApiFailure> {
    match state.orchestrator.calibration(&user_id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(not_found(format!("No calibration for user {}", user_id))),
        Err(e) => Err(error_response(e)),
    }
}

/// Run one chat turn
///
/// POST /api/v1/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiFailure> {
    match state.orchestrator.chat(request).await {
        Ok(reply) => Ok(Json(reply)),
        Err(e) => {
            error!("Chat turn failed: {}", e);
            Err(error_response(e))
        }
    }
}

/// GET /api/v1/conversations/:id
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationRecord>, ApiFailure> {
    match state.orchestrator.conversation(&conversation_id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(not_found(format!("No conversation {}", conversation_id))),
        Err(e) => Err(error_response(e)),
    }
}

/// POST /api/v1/conversations/:id/chain
pub async fn start_chain(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Json(request): Json<StartChainRequest>,
) -> Result<(StatusCode, Json<ChainProgress>), ApiFailure> {
    state
        .orchestrator
        .start_chain(&conversation_id, &request.chain_id)
        .await
        .map(|progress| (StatusCode::CREATED, Json(progress)))
        .map_err(error_response)
}

/// DELETE /api/v1/conversations/:id/chain
pub async fn abandon_chain(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<AbandonChainResponse>, ApiFailure> {
    state
        .orchestrator
        .abandon_chain(&conversation_id)
        .await
        .map(|abandoned| Json(AbandonChainResponse { abandoned }))
        .map_err(error_response)
}
