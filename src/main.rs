//! ELARA tutoring server

use elara::{
    api::{build_router, AppState},
    chain::{default_chains, ChainEngine},
    config::Config,
    llm::GeminiClient,
    matching::{default_questionnaire, MatchingEngine},
    observability::init_tracing,
    personas::default_registry,
    session::{InMemorySessionStore, SessionOrchestrator},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ELARA_CONFIG").ok())
        .map(PathBuf::from);

    let config = Config::load(config_path.as_deref())?;
    init_tracing(&config.logging);

    if config.llm.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; chat turns will fail until it is configured");
    }

    let registry = Arc::new(default_registry());
    let matching = MatchingEngine::new(registry, default_questionnaire())?;
    let chains = ChainEngine::new(default_chains())?;

    let addr = config.server.socket_addr()?;
    let body_limit = config.server.body_limit_bytes;
    let model = config.llm.model.clone();
    let llm = GeminiClient::new(config.llm)?;

    let orchestrator = SessionOrchestrator::new(
        matching,
        chains,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(llm),
        config.matching,
    )?;

    let app = build_router(AppState::new(Arc::new(orchestrator)), body_limit);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("ELARA listening on {} (model {})", addr, model);
    axum::serve(listener, app).await?;

    Ok(())
}
