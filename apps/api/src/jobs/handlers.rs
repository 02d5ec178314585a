//! Axum route handlers for the Jobs API.
//!
//! Recruiters manage their own postings; candidates browse active postings,
//! each annotated with whether they applied and how well their profile matches.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{CandidateUser, RecruiterUser};
use crate::candidates::profile::fetch_candidate;
use crate::errors::AppError;
use crate::jobs::store::{
    applied_job_ids, delete_job, get_job, get_recruiter_job, insert_job, list_active_jobs,
    list_recruiter_jobs, update_job, JobBoardFilters, RecruiterJobFilters,
};
use crate::jobs::validation::JobPayload;
use crate::matching::generate::{regenerate_recruiter_matches, score_candidate_for_job};
use crate::models::job::{JobRow, JobStatus};
use crate::pagination::{resolve_page, Paginated};
use crate::state::AppState;

const RECRUITER_PAGE_SIZE: i64 = 10;
const BOARD_PAGE_SIZE: i64 = 12;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RecruiterJobQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobBoardQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub skills: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// A job as a candidate sees it.
#[derive(Debug, Serialize)]
pub struct CandidateJobView {
    #[serde(flatten)]
    pub job: JobRow,
    pub has_applied: bool,
    pub match_score: u32,
    pub matched_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_status_filter(value: Option<&str>) -> Result<Option<JobStatus>, AppError> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(raw) => serde_json::from_value(serde_json::Value::String(raw.to_string()))
            .map(Some)
            .map_err(|_| AppError::Validation(format!("unknown job status '{raw}'"))),
    }
}

/// Regenerates the recruiter's matches after a job write. Failures are logged only.
async fn regenerate_after_write(state: &AppState, recruiter_id: Uuid) {
    if let Err(e) = regenerate_recruiter_matches(&state.db, recruiter_id).await {
        warn!("Match regeneration failed for recruiter {recruiter_id}: {e}");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/recruiter/jobs
pub async fn handle_list_recruiter_jobs(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
    Query(query): Query<RecruiterJobQuery>,
) -> Result<Json<Paginated<JobRow>>, AppError> {
    let page = resolve_page(query.page, query.limit, RECRUITER_PAGE_SIZE)?;
    let filters = RecruiterJobFilters {
        status: parse_status_filter(query.status.as_deref())?,
        search: query.search,
    };

    let (jobs, total) = list_recruiter_jobs(&state.db, recruiter_id, &filters, page).await?;
    Ok(Json(Paginated::new(jobs, page, total)))
}

/// POST /api/v1/recruiter/jobs
///
/// New postings always start active.
pub async fn handle_create_job(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
    Json(payload): Json<JobPayload>,
) -> Result<Json<JobRow>, AppError> {
    let mut draft = payload.validate()?;
    draft.status = JobStatus::Active;

    let job = insert_job(&state.db, recruiter_id, &draft).await?;
    info!("Recruiter {recruiter_id} created job {} ({})", job.id, job.title);

    regenerate_after_write(&state, recruiter_id).await;
    Ok(Json(job))
}

/// GET /api/v1/recruiter/jobs/:id
pub async fn handle_get_recruiter_job(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job = get_recruiter_job(&state.db, recruiter_id, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// PUT /api/v1/recruiter/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<JobPayload>,
) -> Result<Json<JobRow>, AppError> {
    let draft = payload.validate()?;

    let job = update_job(&state.db, recruiter_id, job_id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    info!("Recruiter {recruiter_id} updated job {job_id} (status {})", job.status);

    regenerate_after_write(&state, recruiter_id).await;
    Ok(Json(job))
}

/// DELETE /api/v1/recruiter/jobs/:id
///
/// Applications and matches for the job are removed with it.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !delete_job(&state.db, recruiter_id, job_id).await? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    info!("Recruiter {recruiter_id} deleted job {job_id}");

    Ok(Json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/candidate/jobs
///
/// Active jobs, newest first, scored against the caller's profile.
pub async fn handle_list_board_jobs(
    State(state): State<AppState>,
    CandidateUser(candidate_id): CandidateUser,
    Query(query): Query<JobBoardQuery>,
) -> Result<Json<Paginated<CandidateJobView>>, AppError> {
    let page = resolve_page(query.page, query.limit, BOARD_PAGE_SIZE)?;
    let filters = JobBoardFilters {
        search: query.search,
        location: query.location,
        job_type: query.job_type,
        skills: query.skills,
    };

    let candidate = fetch_candidate(&state.db, candidate_id).await?;
    let (jobs, total) = list_active_jobs(&state.db, &filters, page).await?;

    let ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();
    let applied = applied_job_ids(&state.db, candidate_id, &ids).await?;

    let items = jobs
        .into_iter()
        .map(|job| {
            let result = score_candidate_for_job(&candidate, &job);
            CandidateJobView {
                has_applied: applied.contains(&job.id),
                match_score: result.score,
                matched_skills: result.matched_skills,
                job,
            }
        })
        .collect();

    Ok(Json(Paginated::new(items, page, total)))
}

/// GET /api/v1/candidate/jobs/:id
pub async fn handle_get_board_job(
    State(state): State<AppState>,
    CandidateUser(candidate_id): CandidateUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<CandidateJobView>, AppError> {
    let job = get_job(&state.db, job_id)
        .await?
        .filter(JobRow::is_active)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let candidate = fetch_candidate(&state.db, candidate_id).await?;
    let applied = applied_job_ids(&state.db, candidate_id, &[job.id]).await?;
    let result = score_candidate_for_job(&candidate, &job);

    Ok(Json(CandidateJobView {
        has_applied: applied.contains(&job.id),
        match_score: result.score,
        matched_skills: result.matched_skills,
        job,
    }))
}
