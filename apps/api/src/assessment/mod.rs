//! Candidate Assessment — pluggable, trait-based assessor with a deterministic fallback.
//!
//! Primary: `LlmAssessor` (hosted model, structured JSON output).
//! Fallback: `heuristic_assessment` (Match Scorer, always available).
//!
//! `AppState` holds an `AssessmentService`, which never fails: any error or
//! timeout on the primary path is logged and replaced by the heuristic result.

pub mod fallback;
pub mod models;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

pub use fallback::heuristic_assessment;
pub use models::{AiAssessment, AssessmentSource};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::application::ResumeData;
use crate::models::job::JobRow;
use prompts::{build_assessment_prompt, ASSESSMENT_SYSTEM};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap assessment backends without touching handlers.
#[async_trait]
pub trait Assessor: Send + Sync {
    async fn assess(&self, resume: &ResumeData, job: &JobRow) -> Result<AiAssessment, AppError>;

    /// Backend label for logs.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAssessor
// ────────────────────────────────────────────────────────────────────────────

/// Semantic assessment via the hosted model.
pub struct LlmAssessor(pub LlmClient);

#[async_trait]
impl Assessor for LlmAssessor {
    async fn assess(&self, resume: &ResumeData, job: &JobRow) -> Result<AiAssessment, AppError> {
        let prompt = build_assessment_prompt(resume, job);

        let mut assessment = self
            .0
            .call_json::<AiAssessment>(&prompt, ASSESSMENT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Assessment call failed: {e}")))?;

        assessment
            .validate()
            .map_err(|e| AppError::Llm(format!("Assessment rejected: {e}")))?;
        assessment.assessed_by = AssessmentSource::Ai;

        Ok(assessment)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AssessmentService — primary with timeout, heuristic fallback
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AssessmentService {
    primary: Option<Arc<dyn Assessor>>,
    timeout: Duration,
}

impl AssessmentService {
    pub fn new(primary: Option<Arc<dyn Assessor>>, timeout: Duration) -> Self {
        Self { primary, timeout }
    }

    /// Heuristic-only service, used when no AI backend is configured.
    pub fn heuristic_only() -> Self {
        Self {
            primary: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn primary_name(&self) -> &'static str {
        self.primary.as_ref().map(|p| p.name()).unwrap_or("none")
    }

    /// Assesses a candidate for a job. Always returns an assessment.
    pub async fn assess(&self, resume: &ResumeData, job: &JobRow) -> AiAssessment {
        let Some(primary) = &self.primary else {
            return heuristic_assessment(resume, job);
        };

        match tokio::time::timeout(self.timeout, primary.assess(resume, job)).await {
            Ok(Ok(assessment)) => {
                info!(
                    "{} assessment for job {}: {}/100",
                    primary.name(),
                    job.id,
                    assessment.overall_score
                );
                assessment
            }
            Ok(Err(e)) => {
                warn!(
                    "{} assessment failed for job {}, using heuristic fallback: {e}",
                    primary.name(),
                    job.id
                );
                heuristic_assessment(resume, job)
            }
            Err(_) => {
                warn!(
                    "{} assessment timed out after {}ms for job {}, using heuristic fallback",
                    primary.name(),
                    self.timeout.as_millis(),
                    job.id
                );
                heuristic_assessment(resume, job)
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
