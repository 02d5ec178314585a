use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const JOB_TYPES: [&str; 5] = ["Full-time", "Part-time", "Contract", "Remote", "Internship"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Paused,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub company: Option<String>,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub job_type: String,
    pub salary: Option<String>,
    pub skills: Vec<String>,
    pub status: String,
    pub applications_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active.as_str()
    }

    pub fn company_or_default(&self) -> &str {
        self.company
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("Company")
    }
}

#[cfg(test)]
pub(crate) fn sample_job(skills: &[&str], description: &str) -> JobRow {
    JobRow {
        id: Uuid::new_v4(),
        recruiter_id: Uuid::new_v4(),
        title: "Backend Engineer".to_string(),
        company: Some("Acme".to_string()),
        description: description.to_string(),
        requirements: String::new(),
        location: "Remote".to_string(),
        job_type: "Full-time".to_string(),
        salary: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        status: "active".to_string(),
        applications_count: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_serde() {
        let status: JobStatus = serde_json::from_str(r#""paused""#).unwrap();
        assert_eq!(status, JobStatus::Paused);
        assert!(serde_json::from_str::<JobStatus>(r#""archived""#).is_err());
    }

    #[test]
    fn test_company_or_default() {
        let mut job = sample_job(&[], "desc");
        assert_eq!(job.company_or_default(), "Acme");
        job.company = Some(" ".to_string());
        assert_eq!(job.company_or_default(), "Company");
        job.company = None;
        assert_eq!(job.company_or_default(), "Company");
    }
}
