mod applications;
mod assessment;
mod auth;
mod candidates;
mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod pagination;
mod resume;
mod routes;
mod state;
mod stats;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::{AssessmentService, LlmAssessor};
use crate::auth::AuthConfig;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::resume::ResumeParser;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&db).await?;

    // Initialize AI services (LLM primary when configured, fallbacks otherwise)
    let (assessor, resume_parser) = build_ai_services(&config)?;
    info!("Assessment backend: {}", assessor.primary_name());

    let state = AppState {
        db,
        auth: AuthConfig::from_secret(&config.jwt_secret),
        assessor,
        resume_parser,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_ai_services(config: &Config) -> Result<(AssessmentService, ResumeParser)> {
    let Some(api_key) = config.ai_api_key() else {
        info!("AI disabled, using heuristic assessment and placeholder resume analysis");
        return Ok((AssessmentService::heuristic_only(), ResumeParser::disabled()));
    };

    let settings = config.llm_settings();
    let llm = LlmClient::new(api_key.to_string(), settings)?;
    info!(
        "LLM client initialized (model: {}, {} attempt(s) x {}s, budget {}s)",
        llm_client::MODEL,
        settings.max_attempts,
        settings.request_timeout.as_secs(),
        config.ai_assessment_timeout.as_secs()
    );

    let assessor = AssessmentService::new(
        Some(Arc::new(LlmAssessor(llm.clone()))),
        config.ai_assessment_timeout,
    );
    let resume_parser = ResumeParser::new(Some(Arc::new(llm)), config.ai_assessment_timeout);
    Ok((assessor, resume_parser))
}
