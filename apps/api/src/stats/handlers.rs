use axum::{extract::State, Json};

use crate::auth::{CandidateUser, RecruiterUser};
use crate::errors::AppError;
use crate::state::AppState;
use crate::stats::{candidate_stats, recruiter_stats, CandidateStats, RecruiterStats};

/// GET /api/v1/recruiter/stats
pub async fn handle_recruiter_stats(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
) -> Result<Json<RecruiterStats>, AppError> {
    Ok(Json(recruiter_stats(&state.db, recruiter_id).await?))
}

/// GET /api/v1/candidate/stats
pub async fn handle_candidate_stats(
    State(state): State<AppState>,
    CandidateUser(candidate_id): CandidateUser,
) -> Result<Json<CandidateStats>, AppError> {
    Ok(Json(candidate_stats(&state.db, candidate_id).await?))
}
