//! `ResumeParser`: model extraction behind a timeout, placeholder on failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::matching::scorer::dedup_skills;
use crate::models::application::{PersonalInfo, ResumeData};
use crate::resume::prompts::{build_resume_prompt, RESUME_SYSTEM};

pub const LIMITED_ACCURACY_WARNING: &str =
    "Resume parsed with limited accuracy. Please review and edit the information.";

/// Turns raw resume text into a `ResumeData` document.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, resume_text: &str) -> Result<ResumeData, AppError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl ResumeExtractor for LlmClient {
    async fn extract(&self, resume_text: &str) -> Result<ResumeData, AppError> {
        let prompt = build_resume_prompt(resume_text);
        self.call_json::<ResumeData>(&prompt, RESUME_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub data: ResumeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Placeholder returned whenever extraction is unavailable or fails.
pub fn fallback_resume() -> ResumeData {
    ResumeData {
        personal_info: PersonalInfo {
            name: Some("Unknown".to_string()),
            ..Default::default()
        },
        experience_summary: Some("Unable to parse resume automatically".to_string()),
        years_of_experience: Some(0.0),
        seniority_level: Some("Unknown".to_string()),
        ..Default::default()
    }
}

#[derive(Clone)]
pub struct ResumeParser {
    extractor: Option<Arc<dyn ResumeExtractor>>,
    timeout: Duration,
}

impl ResumeParser {
    pub fn new(extractor: Option<Arc<dyn ResumeExtractor>>, timeout: Duration) -> Self {
        Self { extractor, timeout }
    }

    /// Parser without a model: every request gets the placeholder.
    pub fn disabled() -> Self {
        Self {
            extractor: None,
            timeout: Duration::ZERO,
        }
    }

    /// Analyzes `resume_text`. Always returns a document.
    pub async fn analyze(&self, resume_text: &str) -> ResumeAnalysis {
        let Some(extractor) = &self.extractor else {
            warn!("Resume analysis unavailable, returning placeholder");
            return Self::fallback();
        };

        match tokio::time::timeout(self.timeout, extractor.extract(resume_text)).await {
            Ok(Ok(mut data)) => {
                data.skills = dedup_skills(&data.skills);
                info!(
                    "{} resume analysis: {} skill(s), {} role(s)",
                    extractor.name(),
                    data.skills.len(),
                    data.experience.len()
                );
                ResumeAnalysis {
                    data,
                    warning: None,
                }
            }
            Ok(Err(e)) => {
                warn!("{} resume analysis failed, returning placeholder: {e}", extractor.name());
                Self::fallback()
            }
            Err(_) => {
                warn!(
                    "{} resume analysis timed out after {}ms, returning placeholder",
                    extractor.name(),
                    self.timeout.as_millis()
                );
                Self::fallback()
            }
        }
    }

    fn fallback() -> ResumeAnalysis {
        ResumeAnalysis {
            data: fallback_resume(),
            warning: Some(LIMITED_ACCURACY_WARNING.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingExtractor;

    #[async_trait]
    impl ResumeExtractor for FailingExtractor {
        async fn extract(&self, _: &str) -> Result<ResumeData, AppError> {
            Err(AppError::Llm("JSON parse error: expected value".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct SlowExtractor;

    #[async_trait]
    impl ResumeExtractor for SlowExtractor {
        async fn extract(&self, _: &str) -> Result<ResumeData, AppError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ResumeData::default())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    struct CannedExtractor(&'static str);

    #[async_trait]
    impl ResumeExtractor for CannedExtractor {
        async fn extract(&self, _: &str) -> Result<ResumeData, AppError> {
            Ok(serde_json::from_str(self.0).unwrap())
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    fn parser(extractor: impl ResumeExtractor + 'static) -> ResumeParser {
        ResumeParser::new(Some(Arc::new(extractor)), Duration::from_secs(5))
    }

    #[test]
    fn test_fallback_document_shape() {
        let json = serde_json::to_value(ResumeParser::fallback()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": {
                    "personalInfo": {"name": "Unknown", "email": null, "phone": null, "location": null},
                    "skills": [],
                    "experience": [],
                    "education": [],
                    "experienceSummary": "Unable to parse resume automatically",
                    "yearsOfExperience": 0.0,
                    "seniorityLevel": "Unknown"
                },
                "warning": LIMITED_ACCURACY_WARNING
            })
        );
    }

    #[tokio::test]
    async fn test_extraction_failure_returns_placeholder() {
        let analysis = parser(FailingExtractor).analyze("Ada Lovelace").await;
        assert_eq!(analysis.warning.as_deref(), Some(LIMITED_ACCURACY_WARNING));
        assert_eq!(analysis.data.candidate_name(), Some("Unknown"));
        assert_eq!(analysis.data.years_of_experience, Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_placeholder() {
        let parser = ResumeParser::new(Some(Arc::new(SlowExtractor)), Duration::from_secs(2));
        let analysis = parser.analyze("Ada Lovelace").await;
        assert!(analysis.warning.is_some());
        assert_eq!(analysis.data.seniority_level.as_deref(), Some("Unknown"));
    }

    #[tokio::test]
    async fn test_disabled_parser_returns_placeholder() {
        let analysis = ResumeParser::disabled().analyze("Ada Lovelace").await;
        assert!(analysis.warning.is_some());
        assert!(analysis.data.skills.is_empty());
    }

    #[tokio::test]
    async fn test_extracted_document_is_kept_with_skills_deduplicated() {
        let analysis = parser(CannedExtractor(
            r#"{
                "personalInfo": {"name": "Ada Lovelace", "email": null},
                "skills": ["Rust", " rust ", "", "PostgreSQL"],
                "experience": [{"company": "Analytical Engines", "position": "Lead Engineer"}],
                "education": null,
                "yearsOfExperience": "5+ years",
                "seniorityLevel": "Senior"
            }"#,
        ))
        .analyze("Ada Lovelace ...")
        .await;

        assert!(analysis.warning.is_none());
        assert_eq!(analysis.data.candidate_name(), Some("Ada Lovelace"));
        assert_eq!(analysis.data.skills, vec!["Rust", "PostgreSQL"]);
        assert_eq!(analysis.data.years_of_experience, Some(5.0));
        assert!(analysis.data.education.is_empty());

        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("warning").is_none());
    }
}
