use axum::extract::FromRef;
use sqlx::PgPool;

use crate::assessment::AssessmentService;
use crate::auth::AuthConfig;
use crate::resume::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthConfig,
    /// AI assessment with heuristic fallback. Never fails.
    pub assessor: AssessmentService,
    /// Resume text extraction with a placeholder fallback. Never fails.
    pub resume_parser: ResumeParser,
}

impl FromRef<AppState> for AuthConfig {
    fn from_ref(input: &AppState) -> AuthConfig {
        input.auth.clone()
    }
}
