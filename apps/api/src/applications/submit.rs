//! Application submission — orchestrates the apply pipeline.
//!
//! Flow: duplicate check → load job → active check → assessment (AI with
//!       heuristic fallback) → insert application + bump job counter in one
//!       transaction.
//!
//! The assessment runs before the transaction opens so no connection is held
//! while the model is thinking.

use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::assessment::AssessmentService;
use crate::errors::AppError;
use crate::jobs::store::get_job;
use crate::models::application::{ApplicationRow, ApplicationStatus, ResumeData};
use crate::models::job::JobRow;

const MAX_COVER_LETTER_LEN: usize = 10_000;
const UNKNOWN_CANDIDATE: &str = "Unknown";

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitApplicationRequest {
    #[serde(alias = "jobId")]
    pub job_id: Uuid,
    #[serde(default, alias = "coverLetter")]
    pub cover_letter: Option<String>,
    #[serde(default, alias = "resumeData")]
    pub resume_data: ResumeData,
}

impl SubmitApplicationRequest {
    fn cover_letter(&self) -> Result<String, AppError> {
        let letter = self.cover_letter.as_deref().unwrap_or_default().trim();
        if letter.chars().count() > MAX_COVER_LETTER_LEN {
            return Err(AppError::Validation(format!(
                "cover_letter must be at most {MAX_COVER_LETTER_LEN} characters"
            )));
        }
        Ok(letter.to_string())
    }
}

/// Name shown to recruiters: resume name, then profile name, then "Unknown".
fn resolve_candidate_name(resume: &ResumeData, profile_name: Option<&str>) -> String {
    resume
        .candidate_name()
        .or_else(|| profile_name.map(str::trim).filter(|n| !n.is_empty()))
        .unwrap_or(UNKNOWN_CANDIDATE)
        .to_string()
}

fn ensure_accepting(job: &JobRow) -> Result<(), AppError> {
    if job.is_active() {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Job is not accepting applications".to_string(),
        ))
    }
}

pub async fn submit_application(
    pool: &PgPool,
    assessor: &AssessmentService,
    candidate_id: Uuid,
    request: SubmitApplicationRequest,
) -> Result<ApplicationRow, AppError> {
    let cover_letter = request.cover_letter()?;

    let already_applied: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM applications WHERE candidate_id = $1 AND job_id = $2)",
    )
    .bind(candidate_id)
    .bind(request.job_id)
    .fetch_one(pool)
    .await?;
    if already_applied {
        return Err(AppError::Conflict("Already applied to this job".to_string()));
    }

    let job = get_job(pool, request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    ensure_accepting(&job)?;

    let profile_name: Option<String> = sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?;
    let candidate_name = resolve_candidate_name(&request.resume_data, profile_name.as_deref());

    info!("Assessing candidate {candidate_id} for job {} via {}", job.id, assessor.primary_name());
    let assessment = assessor.assess(&request.resume_data, &job).await;
    let match_score = assessment.overall_score.min(100) as i32;

    let mut tx = pool.begin().await?;

    // A concurrent submission for the same pair loses on the unique key.
    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (candidate_id, candidate_name, job_id, job_title, company,
                                  recruiter_id, cover_letter, resume_data, ai_assessment,
                                  status, match_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (candidate_id, job_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(&candidate_name)
    .bind(job.id)
    .bind(&job.title)
    .bind(job.company_or_default())
    .bind(job.recruiter_id)
    .bind(&cover_letter)
    .bind(Json(&request.resume_data))
    .bind(Json(&assessment))
    .bind(ApplicationStatus::Pending.as_str())
    .bind(match_score)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::Conflict("Already applied to this job".to_string()))?;

    sqlx::query(
        "UPDATE jobs SET applications_count = applications_count + 1, updated_at = NOW() WHERE id = $1",
    )
    .bind(job.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Application {} submitted: candidate {candidate_id} → job {} (score {}, {:?})",
        application.id, job.id, match_score, assessment.assessed_by
    );

    Ok(application)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::PersonalInfo;
    use crate::models::job::sample_job;

    #[test]
    fn test_request_accepts_camel_case_body() {
        let request: SubmitApplicationRequest = serde_json::from_value(serde_json::json!({
            "jobId": "6f1b3c52-3f7c-4a8e-9d0e-2d7f3b9b1a11",
            "coverLetter": "  Hello  ",
            "resumeData": { "skills": ["Rust"] }
        }))
        .unwrap();
        assert_eq!(request.cover_letter().unwrap(), "Hello");
        assert_eq!(request.resume_data.skills, vec!["Rust"]);
    }

    #[test]
    fn test_missing_cover_letter_is_empty() {
        let request: SubmitApplicationRequest = serde_json::from_value(serde_json::json!({
            "job_id": "6f1b3c52-3f7c-4a8e-9d0e-2d7f3b9b1a11"
        }))
        .unwrap();
        assert_eq!(request.cover_letter().unwrap(), "");
    }

    #[test]
    fn test_oversized_cover_letter_rejected() {
        let request = SubmitApplicationRequest {
            job_id: Uuid::new_v4(),
            cover_letter: Some("x".repeat(MAX_COVER_LETTER_LEN + 1)),
            resume_data: ResumeData::default(),
        };
        assert!(matches!(request.cover_letter(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_candidate_name_resolution_order() {
        let mut resume = ResumeData::default();
        assert_eq!(resolve_candidate_name(&resume, None), "Unknown");
        assert_eq!(resolve_candidate_name(&resume, Some("  ")), "Unknown");
        assert_eq!(resolve_candidate_name(&resume, Some("Ada")), "Ada");

        resume.personal_info = PersonalInfo {
            name: Some("Grace".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_candidate_name(&resume, Some("Ada")), "Grace");
    }

    #[test]
    fn test_only_active_jobs_accept_applications() {
        let mut job = sample_job(&["Rust"], "desc");
        assert!(ensure_accepting(&job).is_ok());

        job.status = "paused".to_string();
        assert!(matches!(ensure_accepting(&job), Err(AppError::Validation(_))));

        job.status = "closed".to_string();
        assert!(ensure_accepting(&job).is_err());
    }
}
