use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Recruiter,
    Candidate,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Recruiter => "recruiter",
            Role::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recruiter" => Ok(Role::Recruiter),
            "candidate" => Ok(Role::Candidate),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// A user row. Recruiter-only and candidate-only profile fields share the table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub resume_text: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Best available free text describing a candidate: the resume body when
    /// present, otherwise a summary stitched from bio, experience and education.
    pub fn candidate_text(&self) -> String {
        if let Some(resume) = self.resume_text.as_deref().filter(|t| !t.trim().is_empty()) {
            return resume.to_string();
        }

        [
            self.position.as_deref(),
            self.bio.as_deref(),
            self.experience.as_deref(),
            self.education.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
    }
}

#[cfg(test)]
pub(crate) fn sample_candidate() -> UserRow {
    UserRow {
        id: Uuid::new_v4(),
        name: "Ada Candidate".to_string(),
        email: "ada@example.com".to_string(),
        role: "candidate".to_string(),
        is_active: true,
        phone: None,
        location: Some("Berlin".to_string()),
        company: None,
        position: None,
        bio: None,
        skills: vec![],
        experience: None,
        education: None,
        resume_text: None,
        linkedin_url: None,
        github_url: None,
        portfolio_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
