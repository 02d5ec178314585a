//! Axum route handlers for the candidate profile.

use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::auth::CandidateUser;
use crate::candidates::profile::{fetch_candidate, update_profile, ProfileUpdate};
use crate::errors::AppError;
use crate::matching::generate::refresh_candidate_matches;
use crate::models::user::UserRow;
use crate::state::AppState;

/// GET /api/v1/candidate/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    CandidateUser(candidate_id): CandidateUser,
) -> Result<Json<UserRow>, AppError> {
    let profile = fetch_candidate(&state.db, candidate_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/candidate/profile
///
/// Applies a partial update, then refreshes the candidate's stored matches.
/// A failed refresh is logged; the profile update still succeeds.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    CandidateUser(candidate_id): CandidateUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserRow>, AppError> {
    let update = update.validate()?;
    let profile = update_profile(&state.db, candidate_id, &update).await?;
    info!("Candidate {candidate_id} updated their profile");

    if let Err(e) = refresh_candidate_matches(&state.db, candidate_id).await {
        warn!("Match refresh failed for candidate {candidate_id}: {e}");
    }

    Ok(Json(profile))
}
