//! Axum route handlers for the Matches API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::{AuthUser, RecruiterUser};
use crate::errors::AppError;
use crate::matching::generate::{
    list_candidate_matches, list_recruiter_matches, regenerate_recruiter_matches, MatchListItem,
};
use crate::models::user::Role;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateMatchesResponse {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchListItem>,
}

/// POST /api/v1/matches/generate
///
/// Replaces the stored matches for every job the recruiter owns.
pub async fn handle_generate_matches(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
) -> Result<Json<GenerateMatchesResponse>, AppError> {
    let count = regenerate_recruiter_matches(&state.db, recruiter_id).await?;

    Ok(Json(GenerateMatchesResponse {
        message: format!("Generated {count} matches"),
        count,
    }))
}

/// GET /api/v1/matches
///
/// Recruiters see matches on their own jobs; candidates see their own matches.
pub async fn handle_list_matches(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MatchListResponse>, AppError> {
    let matches = match user.role {
        Role::Recruiter => list_recruiter_matches(&state.db, user.user_id).await?,
        Role::Candidate => list_candidate_matches(&state.db, user.user_id).await?,
    };

    Ok(Json(MatchListResponse { matches }))
}
