pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::candidates::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matches;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::stats::handlers as stats;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recruiter API
        .route(
            "/api/v1/recruiter/jobs",
            get(jobs::handle_list_recruiter_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/recruiter/jobs/:id",
            get(jobs::handle_get_recruiter_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route(
            "/api/v1/recruiter/applications",
            get(applications::handle_list_recruiter_applications),
        )
        .route(
            "/api/v1/recruiter/applications/:id/status",
            put(applications::handle_update_application_status),
        )
        .route("/api/v1/recruiter/stats", get(stats::handle_recruiter_stats))
        // Candidate API
        .route("/api/v1/candidate/jobs", get(jobs::handle_list_board_jobs))
        .route("/api/v1/candidate/jobs/:id", get(jobs::handle_get_board_job))
        .route(
            "/api/v1/candidate/profile",
            get(candidates::handle_get_profile).put(candidates::handle_update_profile),
        )
        .route(
            "/api/v1/candidate/applications",
            get(applications::handle_list_candidate_applications)
                .post(applications::handle_submit_application),
        )
        .route(
            "/api/v1/candidate/applications/check/:job_id",
            get(applications::handle_check_application),
        )
        .route("/api/v1/candidate/stats", get(stats::handle_candidate_stats))
        .route(
            "/api/v1/candidate/resume/analyze",
            post(resume::handle_analyze_resume),
        )
        // Matches API
        .route("/api/v1/matches", get(matches::handle_list_matches))
        .route(
            "/api/v1/matches/generate",
            post(matches::handle_generate_matches),
        )
        .with_state(state)
}
