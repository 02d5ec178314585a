//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::store::{
    find_application, list_candidate_applications, list_recruiter_applications, update_status,
    ApplicationFilters,
};
use crate::applications::submit::{submit_application, SubmitApplicationRequest};
use crate::auth::{CandidateUser, RecruiterUser};
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::pagination::{resolve_page, Paginated};
use crate::state::AppState;

const RECRUITER_PAGE_SIZE: i64 = 10;
const MAX_FEEDBACK_LEN: usize = 5_000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RecruiterApplicationQuery {
    pub status: Option<String>,
    #[serde(alias = "jobId")]
    pub job_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationRow>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationCheckResponse {
    pub has_applied: bool,
    pub application: Option<ApplicationRow>,
}

fn parse_status(value: &str) -> Result<ApplicationStatus, AppError> {
    ApplicationStatus::parse(value.trim()).ok_or_else(|| {
        let allowed: Vec<&str> = ApplicationStatus::ALL.iter().map(|s| s.as_str()).collect();
        AppError::Validation(format!("status must be one of: {}", allowed.join(", ")))
    })
}

fn parse_status_filter(value: Option<&str>) -> Result<Option<ApplicationStatus>, AppError> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(raw) => parse_status(raw).map(Some),
    }
}

impl StatusUpdateRequest {
    fn validate(&self) -> Result<(ApplicationStatus, String), AppError> {
        let status = parse_status(&self.status)?;
        let feedback = self.feedback.as_deref().unwrap_or_default().trim().to_string();
        if feedback.chars().count() > MAX_FEEDBACK_LEN {
            return Err(AppError::Validation(format!(
                "feedback must be at most {MAX_FEEDBACK_LEN} characters"
            )));
        }
        Ok((status, feedback))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/candidate/applications
pub async fn handle_list_candidate_applications(
    State(state): State<AppState>,
    CandidateUser(candidate_id): CandidateUser,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let applications = list_candidate_applications(&state.db, candidate_id).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

/// POST /api/v1/candidate/applications
///
/// Assesses the candidate (AI with heuristic fallback) and records the application.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    CandidateUser(candidate_id): CandidateUser,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let application =
        submit_application(&state.db, &state.assessor, candidate_id, request).await?;
    Ok(Json(application))
}

/// GET /api/v1/candidate/applications/check/:job_id
pub async fn handle_check_application(
    State(state): State<AppState>,
    CandidateUser(candidate_id): CandidateUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApplicationCheckResponse>, AppError> {
    let application = find_application(&state.db, candidate_id, job_id).await?;
    Ok(Json(ApplicationCheckResponse {
        has_applied: application.is_some(),
        application,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/recruiter/applications
pub async fn handle_list_recruiter_applications(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
    Query(query): Query<RecruiterApplicationQuery>,
) -> Result<Json<Paginated<ApplicationRow>>, AppError> {
    let page = resolve_page(query.page, query.limit, RECRUITER_PAGE_SIZE)?;
    let filters = ApplicationFilters {
        status: parse_status_filter(query.status.as_deref())?,
        job_id: query.job_id,
        search: query.search,
    };

    let (applications, total) =
        list_recruiter_applications(&state.db, recruiter_id, &filters, page).await?;
    Ok(Json(Paginated::new(applications, page, total)))
}

/// PUT /api/v1/recruiter/applications/:id/status
pub async fn handle_update_application_status(
    State(state): State<AppState>,
    RecruiterUser(recruiter_id): RecruiterUser,
    Path(application_id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let (status, feedback) = request.validate()?;

    let application = update_status(&state.db, recruiter_id, application_id, status, &feedback)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    info!(
        "Recruiter {recruiter_id} set application {application_id} to {}",
        status.as_str()
    );

    Ok(Json(application))
}
