use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::assessment::AiAssessment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume data submitted with an application (camelCase document)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceItem {
    pub company: Option<String>,
    pub position: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub year: Option<String>,
}

/// Resume document. Model-produced JSON is accepted leniently: `null` lists
/// read as empty and `yearsOfExperience` may be a number or text like "5+ years".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    #[serde(deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<ExperienceItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationItem>,
    pub experience_summary: Option<String>,
    #[serde(deserialize_with = "lenient_years")]
    pub years_of_experience: Option<f64>,
    pub seniority_level: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearsValue {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Number, numeric text ("7", "3.5", "5+ years") or nothing. Anything else reads as unknown.
fn lenient_years<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let years = match Option::<YearsValue>::deserialize(deserializer)? {
        Some(YearsValue::Number(n)) => Some(n),
        Some(YearsValue::Text(text)) => leading_number(&text),
        Some(YearsValue::Other(_)) | None => None,
    };
    Ok(years.filter(|y| y.is_finite() && *y >= 0.0))
}

fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    text[..end].trim_end_matches('.').parse().ok()
}

impl ResumeData {
    /// Free text fed to the scorer: summary, then each role's position,
    /// company and description.
    pub fn free_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(summary) = self.experience_summary.as_deref() {
            parts.push(summary.to_string());
        }
        if let Some(level) = self.seniority_level.as_deref() {
            parts.push(format!("Seniority: {level}"));
        }
        for item in &self.experience {
            let line = [
                item.position.as_deref(),
                item.company.as_deref(),
                item.description.as_deref(),
            ]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" — ");
            if !line.is_empty() {
                parts.push(line);
            }
        }

        parts.join("\n")
    }

    pub fn candidate_name(&self) -> Option<&str> {
        self.personal_info
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Row
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub recruiter_id: Uuid,
    pub cover_letter: String,
    pub resume_data: Json<ResumeData>,
    pub ai_assessment: Json<AiAssessment>,
    pub status: String,
    pub feedback: String,
    pub match_score: i32,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
