//! Job payload validation.
//!
//! Recruiters submit the same payload for create and update. Validation trims
//! text fields, drops blank skill labels and rejects anything the `jobs` table
//! would refuse, so handlers only ever see a clean `JobDraft`.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::{JobStatus, JOB_TYPES};

const MIN_TITLE_LEN: usize = 3;
const MAX_TITLE_LEN: usize = 200;
const MAX_SKILLS: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct JobPayload {
    #[serde(default)]
    pub title: String,
    pub company: Option<String>,
    #[serde(default)]
    pub description: String,
    pub requirements: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "type")]
    pub job_type: String,
    pub salary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub status: Option<JobStatus>,
}

/// A validated job, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub title: String,
    pub company: Option<String>,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub job_type: String,
    pub salary: Option<String>,
    pub skills: Vec<String>,
    pub status: JobStatus,
}

impl JobPayload {
    pub fn validate(self) -> Result<JobDraft, AppError> {
        let title = self.title.trim().to_string();
        let title_len = title.chars().count();
        if title_len < MIN_TITLE_LEN || title_len > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "title must be between {MIN_TITLE_LEN} and {MAX_TITLE_LEN} characters"
            )));
        }

        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(AppError::Validation("description cannot be empty".to_string()));
        }

        let location = self.location.trim().to_string();
        if location.is_empty() {
            return Err(AppError::Validation("location cannot be empty".to_string()));
        }

        let job_type = self.job_type.trim().to_string();
        if !JOB_TYPES.contains(&job_type.as_str()) {
            return Err(AppError::Validation(format!(
                "type must be one of: {}",
                JOB_TYPES.join(", ")
            )));
        }

        let skills: Vec<String> = self
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if skills.is_empty() {
            return Err(AppError::Validation(
                "at least one skill is required".to_string(),
            ));
        }
        if skills.len() > MAX_SKILLS {
            return Err(AppError::Validation(format!(
                "at most {MAX_SKILLS} skills are allowed"
            )));
        }

        Ok(JobDraft {
            title,
            company: non_blank(self.company),
            description,
            requirements: self.requirements.unwrap_or_default().trim().to_string(),
            location,
            job_type,
            salary: non_blank(self.salary),
            skills,
            status: self.status.unwrap_or(JobStatus::Active),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
