//! Axum route handler for resume analysis.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::CandidateUser;
use crate::errors::AppError;
use crate::models::application::ResumeData;
use crate::state::AppState;

const MAX_RESUME_TEXT_LEN: usize = 50_000;

#[derive(Debug, Deserialize)]
pub struct AnalyzeResumeRequest {
    #[serde(default, alias = "resumeText")]
    pub resume_text: Option<String>,
}

impl AnalyzeResumeRequest {
    fn text(&self) -> Result<&str, AppError> {
        let text = self.resume_text.as_deref().unwrap_or_default().trim();
        if text.is_empty() {
            return Err(AppError::Validation("Resume text is required".to_string()));
        }
        if text.chars().count() > MAX_RESUME_TEXT_LEN {
            return Err(AppError::Validation(format!(
                "resume_text must be at most {MAX_RESUME_TEXT_LEN} characters"
            )));
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResumeResponse {
    pub success: bool,
    pub data: ResumeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /api/v1/candidate/resume/analyze
///
/// Extracts a `ResumeData` document from pasted text. Never fails once the
/// text is accepted: extraction problems yield a placeholder plus `warning`.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    CandidateUser(_candidate_id): CandidateUser,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    let text = request.text()?;
    let analysis = state.resume_parser.analyze(text).await;
    Ok(Json(AnalyzeResumeResponse {
        success: true,
        data: analysis.data,
        warning: analysis.warning,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_both_casings() {
        let camel: AnalyzeResumeRequest =
            serde_json::from_value(serde_json::json!({"resumeText": " Ada "})).unwrap();
        assert_eq!(camel.text().unwrap(), "Ada");

        let snake: AnalyzeResumeRequest =
            serde_json::from_value(serde_json::json!({"resume_text": "Ada"})).unwrap();
        assert_eq!(snake.text().unwrap(), "Ada");
    }

    #[test]
    fn test_missing_or_blank_text_rejected() {
        for body in [serde_json::json!({}), serde_json::json!({"resumeText": "   "})] {
            let request: AnalyzeResumeRequest = serde_json::from_value(body).unwrap();
            match request.text() {
                Err(AppError::Validation(msg)) => assert_eq!(msg, "Resume text is required"),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_oversized_text_rejected() {
        let request = AnalyzeResumeRequest {
            resume_text: Some("x".repeat(MAX_RESUME_TEXT_LEN + 1)),
        };
        assert!(matches!(request.text(), Err(AppError::Validation(_))));
    }
}
