//! Router configuration

use super::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Build the service router
pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/tutors", get(handlers::list_tutors))
        .route("/api/v1/chains", get(handlers::list_chains))
        .route("/api/v1/calibration/questions", get(handlers::calibration_questions))
        .route("/api/v1/calibration", post(handlers::submit_calibration))
        .route("/api/v1/calibration/:user_id", get(handlers::get_calibration))
        .route("/api/v1/chat", post(handlers::chat))
        .route("/api/v1/conversations/:id", get(handlers::get_conversation))
        .route(
            "/api/v1/conversations/:id/chain",
            post(handlers::start_chain).delete(handlers::abandon_chain),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit_bytes)),
        )
        .with_state(state)
}
